use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::quantize::{parse_decimal, QuantizationContext};
use crate::common::errors::{Error, Result};
use crate::common::types::{OrderType, PairConstraints, Quote};

/// Fraction of the bid used for limit orders without an explicit price
///
/// Sitting slightly under the bid keeps the order on the book as a maker.
pub const DEFAULT_LIMIT_PERCENTAGE: Decimal = dec!(0.9995);

/// User pricing choices for a limit order
///
/// An explicit `price` wins over `percentage`. With neither set the price is
/// [`DEFAULT_LIMIT_PERCENTAGE`] of the bid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitPricing {
    pub price: Option<Decimal>,
    pub percentage: Option<Decimal>,
}

impl LimitPricing {
    pub fn at_percentage(percentage: Decimal) -> Self {
        Self {
            price: None,
            percentage: Some(percentage),
        }
    }

    /// Build from optional command-line strings
    pub fn parse(price: Option<&str>, percentage: Option<&str>) -> Result<Self> {
        Ok(Self {
            price: price.map(parse_decimal).transpose()?,
            percentage: percentage.map(parse_decimal).transpose()?,
        })
    }
}

/// Resolve the price an order is placed at
///
/// * Limit with an explicit price: that price, quantized to the pair's decimals.
/// * Limit without one: `bid × percentage`, quantized to the context scale
///   and then to the pair's decimals.
/// * Market: the ask, quantized to the pair's decimals.
pub fn resolve_price(
    ctx: &QuantizationContext,
    order_type: OrderType,
    pricing: &LimitPricing,
    quote: &Quote,
    constraints: &PairConstraints,
) -> Result<Decimal> {
    let price = match order_type {
        OrderType::Limit => match pricing.price {
            Some(explicit) => ctx.quantize_to(explicit, constraints.price_decimals)?,
            None => {
                let percentage = ctx.quantize(pricing.percentage.unwrap_or(DEFAULT_LIMIT_PERCENTAGE))?;
                let bid = ctx.quantize(quote.bid)?;
                let discounted = ctx.quantize(ctx.mul(bid, percentage)?)?;
                debug!(%bid, %percentage, %discounted, "limit price from bid");
                ctx.quantize_to(discounted, constraints.price_decimals)?
            }
        },
        OrderType::Market => {
            if pricing.price.is_some() || pricing.percentage.is_some() {
                debug!("limit pricing ignored for market order");
            }
            ctx.quantize_to(quote.ask, constraints.price_decimals)?
        }
    };

    if price <= Decimal::ZERO {
        return Err(Error::InvalidPrice(price));
    }
    Ok(price)
}
