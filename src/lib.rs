//! AutomateCrypto Library
//!
//! Sizes fee-aware buy orders and fee-capped withdrawals and submits them
//! to Kraken.

pub mod actions;
pub mod common;
pub mod config;
pub mod kraken;
pub mod sizing;

// Re-export commonly used types
pub use actions::{buy_crypto, withdraw_crypto, BuyOutcome, BuyRequest, WithdrawOutcome, WithdrawRequest};
pub use common::errors::{Error, Result};
pub use common::traits::Exchange;
pub use common::types::{
    FeeSchedule, OrderConfirmation, OrderFlag, OrderSpec, OrderType, PairConstraints, Quote, Side,
    WithdrawalDecision, WithdrawalQuote, WithdrawalSpec,
};
pub use config::types::AppConfig;
pub use kraken::client::KrakenClient;
pub use kraken::rest::KrakenRestClient;
pub use sizing::{QuantizationContext, Rounding};
