//! Trait definitions for exchange clients

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::Result;
use super::types::{FeeSchedule, OrderConfirmation, OrderSpec, PairConstraints, Quote, WithdrawalQuote};

/// Market data and submission operations the calculator depends on
///
/// Implementations own authentication and transport. Failures are returned
/// unchanged; nothing here retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Minimum volume and price precision for a pair
    async fn pair_constraints(&self, pair: &str) -> Result<PairConstraints>;

    /// Maker and taker fee percentages for a pair
    async fn fee_schedule(&self, pair: &str) -> Result<FeeSchedule>;

    /// Current best bid and ask
    async fn quote(&self, pair: &str) -> Result<Quote>;

    /// Fee and minimum for withdrawing `asset` to the address saved as `key`
    ///
    /// # Arguments
    /// * `amount` - Amount to quote the fee for, or `None` to quote the minimum
    async fn withdrawal_quote(
        &self,
        asset: &str,
        key: &str,
        amount: Option<Decimal>,
    ) -> Result<WithdrawalQuote>;

    /// Place an order
    async fn submit_order(&self, order: &OrderSpec) -> Result<OrderConfirmation>;

    /// Request a withdrawal, returning the exchange reference id
    async fn submit_withdrawal(&self, asset: &str, key: &str, amount: Decimal) -> Result<String>;

    /// Get the name of the exchange
    fn exchange_name(&self) -> &'static str;
}
