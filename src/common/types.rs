//! Domain types shared by the calculator and the exchange clients

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::Error;

/// Exchange-imposed constraints for a trading pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConstraints {
    /// Minimum tradable volume (ordermin)
    pub minimum_volume: Decimal,
    /// Number of decimal places the exchange accepts for prices on this pair
    pub price_decimals: u32,
}

/// Best bid/ask for a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: Decimal,
    pub ask: Decimal,
}

impl Quote {
    pub fn new(bid: Decimal, ask: Decimal) -> Self {
        Self { bid, ask }
    }
}

/// Fee percentages charged on the notional of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee for orders adding liquidity, in percent
    pub maker_percent: Decimal,
    /// Fee for orders removing liquidity, in percent
    pub taker_percent: Decimal,
}

/// Exchange quote for withdrawing an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalQuote {
    /// Fixed fee the exchange charges for the withdrawal
    pub fee: Decimal,
    /// Smallest amount the exchange lets you withdraw
    pub minimum: Decimal,
}

/// Order side. Only buying is automated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Rests on the book at a given price; charged the maker fee
    Limit,
    /// Crosses the spread immediately; charged the taker fee
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "limit" => Ok(OrderType::Limit),
            "market" => Ok(OrderType::Market),
            _ => Err(Error::UnsupportedOrderType(s.to_string())),
        }
    }
}

/// Order flags understood by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderFlag {
    /// Take the fee in the quote currency (the fiat being spent)
    #[serde(rename = "fciq")]
    FeeInQuote,
    /// Take the fee in the base currency (the crypto being bought)
    #[serde(rename = "fcib")]
    FeeInBase,
}

impl OrderFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderFlag::FeeInQuote => "fciq",
            OrderFlag::FeeInBase => "fcib",
        }
    }
}

impl std::fmt::Display for OrderFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully sized order ready for submission
///
/// Only the order assembly in [`crate::sizing`] can build one, so every
/// value in it has passed through quantization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSpec {
    pair: String,
    side: Side,
    order_type: OrderType,
    volume: Decimal,
    price: Decimal,
    flags: Vec<OrderFlag>,
    validate: bool,
}

impl OrderSpec {
    pub(crate) fn new(
        pair: impl Into<String>,
        order_type: OrderType,
        volume: Decimal,
        price: Decimal,
        flags: Vec<OrderFlag>,
        validate: bool,
    ) -> Self {
        Self {
            pair: pair.into(),
            side: Side::Buy,
            order_type,
            volume,
            price,
            flags,
            validate,
        }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn flags(&self) -> &[OrderFlag] {
        &self.flags
    }

    /// Whether only validation was requested
    pub fn validate(&self) -> bool {
        self.validate
    }
}

impl std::fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} @ {} {}",
            self.side, self.volume, self.pair, self.order_type, self.price
        )?;
        if !self.flags.is_empty() {
            let flags: Vec<&str> = self.flags.iter().map(OrderFlag::as_str).collect();
            write!(f, " [{}]", flags.join(","))?;
        }
        Ok(())
    }
}

/// Exchange acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Exchange description of the order
    pub description: String,
    /// Transaction ids, empty when the exchange only validated the order
    pub txids: Vec<String>,
}

/// Outcome of the withdrawal fee gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalDecision {
    Proceed,
    Blocked,
}

/// A withdrawal with its fee assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalSpec {
    pub asset: String,
    /// Gross amount leaving the account
    pub amount: Decimal,
    /// Fixed exchange fee
    pub fee: Decimal,
    /// Amount credited at the destination
    pub net_amount: Decimal,
    /// Fee as a percentage of the amount
    pub fee_percent: Decimal,
    /// User ceiling for `fee_percent`
    pub max_fee_percent: Decimal,
    pub decision: WithdrawalDecision,
}

impl WithdrawalSpec {
    pub fn proceeds(&self) -> bool {
        self.decision == WithdrawalDecision::Proceed
    }
}

impl std::fmt::Display for WithdrawalSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "withdraw {} {} (fee {}, net {}, fee {}% of max {}%)",
            self.amount, self.asset, self.fee, self.net_amount, self.fee_percent, self.max_fee_percent
        )
    }
}
