use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::fees::{fee_currency_flag, fee_fraction};
use super::price::{resolve_price, LimitPricing};
use super::quantize::QuantizationContext;
use crate::common::errors::{Error, Result};
use crate::common::types::{FeeSchedule, OrderSpec, OrderType, PairConstraints, Quote};

/// Breakdown of a fiat budget into fee, net spend and volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sizing {
    /// Gross fiat budget
    pub amount: Decimal,
    /// Fee fraction applied to the budget
    pub fee_fraction: Decimal,
    /// Price the volume is computed at
    pub price: Decimal,
    pub fee_paid: Decimal,
    /// Budget left after the fee
    pub net_fiat: Decimal,
    pub volume: Decimal,
}

/// Split a fiat budget into fee and net spend, then size the volume
///
/// Each step is quantized, so `fee_paid + net_fiat == amount` exactly. The
/// fee is taken out of the budget before sizing, never added on top.
pub fn size_order(
    ctx: &QuantizationContext,
    amount: Decimal,
    fee_fraction: Decimal,
    price: Decimal,
) -> Result<Sizing> {
    let amount = ctx.quantize(amount)?;
    let fee_fraction = ctx.quantize(fee_fraction)?;
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    if price <= Decimal::ZERO {
        return Err(Error::InvalidPrice(price));
    }

    let fee_paid = ctx.quantize(ctx.mul(amount, fee_fraction)?)?;
    let net_fiat = ctx.quantize(amount - fee_paid)?;
    let volume = ctx.quantize(ctx.div(net_fiat, price)?)?;

    Ok(Sizing {
        amount,
        fee_fraction,
        price,
        fee_paid,
        net_fiat,
        volume,
    })
}

/// Reject volumes below the exchange minimum
///
/// A volume equal to the minimum is accepted.
pub fn ensure_minimum_volume(volume: Decimal, minimum: Decimal) -> Result<()> {
    if volume < minimum {
        return Err(Error::MinimumVolumeNotMet { minimum, volume });
    }
    Ok(())
}

/// Market data an order is sized against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub constraints: PairConstraints,
    pub quote: Quote,
    pub fees: FeeSchedule,
}

/// What the user asked to buy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub pair: String,
    pub order_type: OrderType,
    pub pricing: LimitPricing,
    /// Fiat budget, fee included
    pub amount: Decimal,
    /// `"fiat"` or `"crypto"`; anything else sends no fee flag
    pub fee_currency: String,
    pub validate: bool,
}

/// A validated order together with the numbers behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    pub order: OrderSpec,
    pub sizing: Sizing,
}

/// Run the full calculation for a buy order
///
/// Resolves price and fee, sizes the order, checks the minimum volume and
/// attaches the fee currency flag.
pub fn plan_order(
    ctx: &QuantizationContext,
    request: &OrderRequest,
    market: &MarketSnapshot,
) -> Result<OrderPlan> {
    let price = resolve_price(
        ctx,
        request.order_type,
        &request.pricing,
        &market.quote,
        &market.constraints,
    )?;
    let fee = fee_fraction(ctx, request.order_type, &market.fees)?;
    let sizing = size_order(ctx, request.amount, fee, price)?;
    debug!(?sizing, pair = %request.pair, "sized order");

    let minimum = ctx.quantize(market.constraints.minimum_volume)?;
    ensure_minimum_volume(sizing.volume, minimum)?;

    let flags = fee_currency_flag(&request.fee_currency).into_iter().collect();
    let order = OrderSpec::new(
        request.pair.clone(),
        request.order_type,
        sizing.volume,
        sizing.price,
        flags,
        request.validate,
    );
    Ok(OrderPlan { order, sizing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::OrderFlag;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            constraints: PairConstraints {
                minimum_volume: dec!(0.0001),
                price_decimals: 2,
            },
            quote: Quote::new(dec!(30000.00), dec!(30000.10)),
            fees: FeeSchedule {
                maker_percent: dec!(0.16),
                taker_percent: dec!(0.26),
            },
        }
    }

    fn request(order_type: OrderType, amount: Decimal) -> OrderRequest {
        OrderRequest {
            pair: "XXBTZUSD".to_string(),
            order_type,
            pricing: LimitPricing::default(),
            amount,
            fee_currency: "fiat".to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_size_order_deducts_fee_before_sizing() {
        let ctx = QuantizationContext::default();
        let sizing = size_order(&ctx, dec!(100.00), dec!(0.0016), dec!(29985.00)).unwrap();
        assert_eq!(sizing.fee_paid, dec!(0.16));
        assert_eq!(sizing.net_fiat, dec!(99.84));
        assert_eq!(sizing.volume, dec!(0.00332966));
        assert_eq!(sizing.fee_paid + sizing.net_fiat, sizing.amount);
    }

    #[test]
    fn test_plan_rejects_negative_maker_fee() {
        let ctx = QuantizationContext::default();
        let mut market = snapshot();
        market.fees.maker_percent = dec!(-0.02);
        let err = plan_order(&ctx, &request(OrderType::Limit, dec!(100)), &market).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_fee_conservation_across_budgets() {
        let ctx = QuantizationContext::default();
        let amounts = [
            dec!(0.00000001),
            dec!(1),
            dec!(13.37),
            dec!(100),
            dec!(999.99999999),
            dec!(25000.12345678),
        ];
        let fees = [dec!(0), dec!(0.0016), dec!(0.0026), dec!(0.00333333), dec!(0.99999999)];
        for amount in amounts {
            for fee in fees {
                let sizing = size_order(&ctx, amount, fee, dec!(29985.00)).unwrap();
                assert_eq!(
                    sizing.fee_paid + sizing.net_fiat,
                    sizing.amount,
                    "fee drift for amount {} fee {}",
                    amount,
                    fee
                );
            }
        }
    }

    #[test]
    fn test_volume_grows_with_budget() {
        let ctx = QuantizationContext::default();
        let mut previous = Decimal::ZERO;
        let mut amount = dec!(1);
        while amount < dec!(1000) {
            let sizing = size_order(&ctx, amount, dec!(0.0026), dec!(30000.1)).unwrap();
            assert!(sizing.volume >= previous, "volume shrank at {}", amount);
            previous = sizing.volume;
            amount += dec!(7.77);
        }
    }

    #[test]
    fn test_size_order_rejects_non_positive_inputs() {
        let ctx = QuantizationContext::default();
        assert!(matches!(
            size_order(&ctx, dec!(0), dec!(0.0016), dec!(100)),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            size_order(&ctx, dec!(10), dec!(0.0016), dec!(0)),
            Err(Error::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_minimum_volume_boundary() {
        let step = QuantizationContext::default().step();
        assert!(ensure_minimum_volume(dec!(0.0001), dec!(0.0001)).is_ok());

        let err = ensure_minimum_volume(dec!(0.0001) - step, dec!(0.0001)).unwrap_err();
        match err {
            Error::MinimumVolumeNotMet { minimum, volume } => {
                assert_eq!(minimum, dec!(0.0001));
                assert_eq!(volume, dec!(0.00009999));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plan_limit_order() {
        let ctx = QuantizationContext::default();
        let plan = plan_order(&ctx, &request(OrderType::Limit, dec!(100.00)), &snapshot()).unwrap();

        assert_eq!(plan.order.price(), dec!(29985.00));
        assert_eq!(plan.order.volume(), dec!(0.00332966));
        assert_eq!(plan.order.flags(), &[OrderFlag::FeeInQuote]);
        assert_eq!(plan.order.order_type(), OrderType::Limit);
        assert_eq!(plan.sizing.fee_paid, dec!(0.16));
    }

    #[test]
    fn test_plan_market_order_uses_taker_fee_and_ask() {
        let ctx = QuantizationContext::default();
        let mut req = request(OrderType::Market, dec!(100.00));
        req.fee_currency = "crypto".to_string();
        let plan = plan_order(&ctx, &req, &snapshot()).unwrap();

        assert_eq!(plan.sizing.price, dec!(30000.10));
        assert_eq!(plan.sizing.fee_paid, dec!(0.26));
        assert_eq!(plan.sizing.net_fiat, dec!(99.74));
        // 99.74 / 30000.10 = 0.0033246555...
        assert_eq!(plan.order.volume(), dec!(0.00332465));
        assert_eq!(plan.order.flags(), &[OrderFlag::FeeInBase]);
    }

    #[test]
    fn test_plan_rejects_small_budget() {
        let ctx = QuantizationContext::default();
        let err = plan_order(&ctx, &request(OrderType::Limit, dec!(2.00)), &snapshot()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::MinimumVolumeNotMet { .. }));
        assert!(message.contains("0.0001"));
        assert!(message.contains("0.00006659"));
    }

    #[test]
    fn test_unknown_fee_currency_sends_no_flag() {
        let ctx = QuantizationContext::default();
        let mut req = request(OrderType::Limit, dec!(100.00));
        req.fee_currency = "none".to_string();
        let plan = plan_order(&ctx, &req, &snapshot()).unwrap();
        assert!(plan.order.flags().is_empty());
    }
}
