//! Kraken REST message types
//!
//! Kraken wraps every response in `{"error": [...], "result": ...}` and sends
//! decimal values as JSON strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::common::errors::{Error, Result};
use crate::sizing::parse_decimal;

/// Response envelope shared by all endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

impl<T> KrakenResponse<T> {
    /// The result, or the exchange errors when there are any
    pub fn into_result(self) -> Result<T> {
        if !self.error.is_empty() {
            return Err(Error::Exchange(self.error));
        }
        self.result
            .ok_or_else(|| Error::InvalidResponse("response has neither error nor result".to_string()))
    }
}

/// Entry of `/0/public/AssetPairs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPairInfo {
    #[serde(default)]
    pub altname: Option<String>,
    #[serde(default)]
    pub wsname: Option<String>,
    pub base: String,
    pub quote: String,
    /// Price precision
    pub pair_decimals: u32,
    /// Volume precision
    #[serde(default)]
    pub lot_decimals: Option<u32>,
    /// Minimum order volume
    #[serde(default)]
    pub ordermin: Option<String>,
}

/// Entry of `/0/public/Ticker`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerInfo {
    /// Ask `[price, whole lot volume, lot volume]`
    pub a: Vec<String>,
    /// Bid `[price, whole lot volume, lot volume]`
    pub b: Vec<String>,
    /// Last trade closed `[price, lot volume]`
    #[serde(default)]
    pub c: Vec<String>,
}

impl TickerInfo {
    pub fn best_ask(&self) -> Result<Decimal> {
        first_decimal(&self.a, "ask")
    }

    pub fn best_bid(&self) -> Result<Decimal> {
        first_decimal(&self.b, "bid")
    }
}

fn first_decimal(values: &[String], field: &str) -> Result<Decimal> {
    let value = values
        .first()
        .ok_or_else(|| Error::InvalidResponse(format!("Ticker has no {} price", field)))?;
    parse_field(value, field)
}

/// Result of `/0/private/TradeVolume`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeVolumeResponse {
    pub currency: String,
    pub volume: String,
    /// Taker fees by pair
    #[serde(default)]
    pub fees: Option<HashMap<String, FeeTierInfo>>,
    /// Maker fees by pair
    #[serde(default)]
    pub fees_maker: Option<HashMap<String, FeeTierInfo>>,
}

/// Fee tier for one pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeTierInfo {
    /// Current fee in percent
    pub fee: String,
    #[serde(default)]
    pub minfee: Option<String>,
    #[serde(default)]
    pub maxfee: Option<String>,
    #[serde(default)]
    pub nextfee: Option<String>,
    #[serde(default)]
    pub nextvolume: Option<String>,
    #[serde(default)]
    pub tiervolume: Option<String>,
}

/// Result of `/0/private/AddOrder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOrderResponse {
    pub descr: OrderDescription,
    /// Absent when the order was only validated
    #[serde(default)]
    pub txid: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDescription {
    pub order: String,
    #[serde(default)]
    pub close: Option<String>,
}

/// Entry of `/0/private/WithdrawMethods`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawMethod {
    pub asset: String,
    pub method: String,
    #[serde(default)]
    pub network: Option<String>,
    pub minimum: String,
}

/// Result of `/0/private/WithdrawInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawInfoResponse {
    pub method: String,
    pub limit: String,
    pub amount: String,
    pub fee: String,
}

/// Result of `/0/private/Withdraw`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub refid: String,
}

/// Parse a decimal string from a response
pub fn parse_field(value: &str, field: &str) -> Result<Decimal> {
    parse_decimal(value).map_err(|e| Error::InvalidResponse(format!("Invalid {}: {}", field, e)))
}

/// Pick the entry for `pair` out of a pair-keyed result
///
/// Kraken may answer `XBTUSD` with the key `XXBTZUSD`, so a single entry is
/// accepted under any name.
pub fn entry_for_pair<T>(mut entries: HashMap<String, T>, pair: &str) -> Result<T> {
    if let Some(entry) = entries.remove(pair) {
        return Ok(entry);
    }
    if entries.len() == 1 {
        if let Some((_, entry)) = entries.into_iter().next() {
            return Ok(entry);
        }
    }
    Err(Error::PairNotFound(pair.to_string()))
}

/// Minimum amount of the withdrawal method named `method`
///
/// Withdrawal keys are bound to one method, and minimums differ between
/// methods of the same asset (on-chain vs Lightning, for example).
pub fn minimum_for_method(methods: &[WithdrawMethod], method: &str) -> Result<Decimal> {
    let entry = methods
        .iter()
        .find(|m| m.method == method)
        .ok_or_else(|| Error::InvalidResponse(format!("No withdrawal method named '{}'", method)))?;
    parse_field(&entry.minimum, "withdrawal minimum")
}
