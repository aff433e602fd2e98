use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::quantize::QuantizationContext;
use crate::common::errors::{Error, Result};
use crate::common::types::{WithdrawalDecision, WithdrawalQuote, WithdrawalSpec};

/// Fee ceiling, in percent of the withdrawn amount, when the user sets none
pub const DEFAULT_MAX_FEE_PERCENT: Decimal = dec!(0.5);

/// Decide whether a withdrawal is worth its fee
///
/// `amount` falls back to the exchange minimum when it is `None` or zero.
/// The withdrawal proceeds when `fee / amount × 100` is at most
/// `max_fee_percent`; the boundary itself is allowed. A blocked withdrawal is
/// not an error, it comes back with [`WithdrawalDecision::Blocked`].
pub fn assess_withdrawal(
    ctx: &QuantizationContext,
    asset: &str,
    amount: Option<Decimal>,
    quote: &WithdrawalQuote,
    max_fee_percent: Decimal,
) -> Result<WithdrawalSpec> {
    let amount = match amount {
        Some(amount) if !amount.is_zero() => amount,
        _ => quote.minimum,
    };
    let amount = ctx.quantize(amount)?;
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    let fee = ctx.quantize(quote.fee)?;
    let max_fee_percent = ctx.quantize(max_fee_percent)?;

    let net_amount = ctx.quantize(amount - fee)?;
    let fee_percent = ctx.quantize(ctx.mul(ctx.div(fee, amount)?, dec!(100))?)?;

    let decision = if fee_percent <= max_fee_percent {
        WithdrawalDecision::Proceed
    } else {
        WithdrawalDecision::Blocked
    };

    Ok(WithdrawalSpec {
        asset: asset.to_string(),
        amount,
        fee,
        net_amount,
        fee_percent,
        max_fee_percent,
        decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn btc_quote() -> WithdrawalQuote {
        WithdrawalQuote {
            fee: dec!(0.00015),
            minimum: dec!(0.007),
        }
    }

    #[test]
    fn test_minimum_amount_with_high_fee_is_blocked() {
        let ctx = QuantizationContext::default();
        let spec = assess_withdrawal(&ctx, "XBT", None, &btc_quote(), dec!(0.5)).unwrap();

        assert_eq!(spec.amount, dec!(0.007));
        assert_eq!(spec.fee_percent, dec!(2.14285714));
        assert_eq!(spec.net_amount, dec!(0.00685));
        assert_eq!(spec.decision, WithdrawalDecision::Blocked);
        assert!(!spec.proceeds());
    }

    #[test]
    fn test_zero_amount_falls_back_to_minimum() {
        let ctx = QuantizationContext::default();
        let spec = assess_withdrawal(&ctx, "XBT", Some(Decimal::ZERO), &btc_quote(), dec!(0.5)).unwrap();
        assert_eq!(spec.amount, dec!(0.007));
    }

    #[test]
    fn test_large_amount_proceeds() {
        let ctx = QuantizationContext::default();
        let spec = assess_withdrawal(&ctx, "XBT", Some(dec!(0.1)), &btc_quote(), dec!(0.5)).unwrap();
        assert_eq!(spec.fee_percent, dec!(0.15));
        assert_eq!(spec.net_amount, dec!(0.09985));
        assert!(spec.proceeds());
    }

    #[test]
    fn test_fee_exactly_at_ceiling_proceeds() {
        let ctx = QuantizationContext::default();
        // 0.00015 / 0.03 * 100 = 0.5
        let spec = assess_withdrawal(&ctx, "XBT", Some(dec!(0.03)), &btc_quote(), dec!(0.5)).unwrap();
        assert_eq!(spec.fee_percent, dec!(0.5));
        assert_eq!(spec.decision, WithdrawalDecision::Proceed);
    }

    #[test]
    fn test_fee_one_unit_above_ceiling_is_blocked() {
        let ctx = QuantizationContext::default();
        let ceiling = dec!(0.5) - ctx.step();
        let spec = assess_withdrawal(&ctx, "XBT", Some(dec!(0.03)), &btc_quote(), ceiling).unwrap();
        assert_eq!(spec.fee_percent, dec!(0.5));
        assert_eq!(spec.decision, WithdrawalDecision::Blocked);
    }

    #[test]
    fn test_zero_minimum_without_amount_is_rejected() {
        let ctx = QuantizationContext::default();
        let quote = WithdrawalQuote {
            fee: dec!(0.1),
            minimum: Decimal::ZERO,
        };
        let err = assess_withdrawal(&ctx, "ETH", None, &quote, dec!(0.5)).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
    }
}
