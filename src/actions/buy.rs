use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use crate::common::errors::{Error, Result};
use crate::common::traits::Exchange;
use crate::common::types::{OrderConfirmation, OrderType};
use crate::sizing::{
    plan_order, LimitPricing, MarketSnapshot, OrderPlan, OrderRequest, QuantizationContext,
    FEE_CURRENCY_FIAT,
};

/// A buy as entered on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequest {
    pub pair: String,
    pub order_type: OrderType,
    pub limit_price: Option<String>,
    pub limit_percentage: Option<String>,
    /// Fiat to spend, fee included
    pub amount: String,
    pub fee_currency: String,
    pub validate: bool,
}

impl BuyRequest {
    /// A limit order at the default discount on the bid, fee paid in fiat
    pub fn limit(pair: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            order_type: OrderType::Limit,
            limit_price: None,
            limit_percentage: None,
            amount: amount.into(),
            fee_currency: FEE_CURRENCY_FIAT.to_string(),
            validate: false,
        }
    }

    /// A market order, fee paid in fiat
    pub fn market(pair: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            order_type: OrderType::Market,
            ..Self::limit(pair, amount)
        }
    }
}

/// Result of a buy
#[derive(Debug, Clone)]
pub struct BuyOutcome {
    pub plan: OrderPlan,
    /// `None` when only validating
    pub confirmation: Option<OrderConfirmation>,
}

/// Size a buy order from live market data and submit it
///
/// With `validate` set, everything up to submission runs and the order is
/// returned without being sent.
#[instrument(skip(exchange, ctx, request), fields(exchange = exchange.exchange_name(), pair = %request.pair))]
pub async fn buy_crypto<E>(exchange: &E, ctx: &QuantizationContext, request: &BuyRequest) -> Result<BuyOutcome>
where
    E: Exchange + ?Sized,
{
    let amount = ctx.quantize(request.amount.as_str())?;
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    let pricing = LimitPricing::parse(
        request.limit_price.as_deref(),
        request.limit_percentage.as_deref(),
    )?;

    let constraints = exchange.pair_constraints(&request.pair).await?;
    let quote = exchange.quote(&request.pair).await?;
    let fees = exchange.fee_schedule(&request.pair).await?;
    info!(
        "Market data for {}: bid {} ask {}, maker {}% taker {}%, ordermin {}",
        request.pair, quote.bid, quote.ask, fees.maker_percent, fees.taker_percent, constraints.minimum_volume
    );

    let order_request = OrderRequest {
        pair: request.pair.clone(),
        order_type: request.order_type,
        pricing,
        amount,
        fee_currency: request.fee_currency.clone(),
        validate: request.validate,
    };
    let market = MarketSnapshot {
        constraints,
        quote,
        fees,
    };

    let plan = match plan_order(ctx, &order_request, &market) {
        Ok(plan) => plan,
        Err(e @ Error::MinimumVolumeNotMet { .. }) => {
            error!("{}; increase the amount to buy", e);
            return Err(e);
        }
        Err(e) => return Err(e),
    };
    info!(
        "Spending {} (fee {} + net {}) on '{}'",
        plan.sizing.amount, plan.sizing.fee_paid, plan.sizing.net_fiat, plan.order
    );

    if request.validate {
        info!("Validate only, order not submitted");
        return Ok(BuyOutcome {
            plan,
            confirmation: None,
        });
    }

    let confirmation = exchange.submit_order(&plan.order).await?;
    info!(
        "Order placed: {} (txids: {})",
        confirmation.description,
        confirmation.txids.join(", ")
    );

    Ok(BuyOutcome {
        plan,
        confirmation: Some(confirmation),
    })
}
