use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::quantize::QuantizationContext;
use crate::common::errors::{Error, Result};
use crate::common::types::{FeeSchedule, OrderFlag, OrderType};

/// Fee currency choice that keeps the fee in the fiat being spent
pub const FEE_CURRENCY_FIAT: &str = "fiat";

/// Fee currency choice that takes the fee out of the crypto being bought
pub const FEE_CURRENCY_CRYPTO: &str = "crypto";

/// Fee fraction charged for an order type
///
/// Limit orders rest on the book and pay the maker fee; market orders pay the
/// taker fee. The schedule is in percent, the result is a fraction quantized
/// to the context scale. A negative percentage is rejected, since the fee is
/// always deducted from the budget.
pub fn fee_fraction(ctx: &QuantizationContext, order_type: OrderType, fees: &FeeSchedule) -> Result<Decimal> {
    let percent = match order_type {
        OrderType::Limit => fees.maker_percent,
        OrderType::Market => fees.taker_percent,
    };
    if percent < Decimal::ZERO {
        return Err(Error::InvalidResponse(format!(
            "{} fee percentage must not be negative, got {}",
            order_type, percent
        )));
    }
    let percent = ctx.quantize(percent)?;
    ctx.quantize(ctx.div(percent, dec!(100))?)
}

/// Order flag selecting the currency the exchange deducts its fee from
///
/// Only changes what the exchange does with the fee. The sizing arithmetic
/// always deducts the fee from the fiat budget, whichever flag is sent.
pub fn fee_currency_flag(fee_currency: &str) -> Option<OrderFlag> {
    match fee_currency {
        FEE_CURRENCY_FIAT => Some(OrderFlag::FeeInQuote),
        FEE_CURRENCY_CRYPTO => Some(OrderFlag::FeeInBase),
        _ => None,
    }
}
