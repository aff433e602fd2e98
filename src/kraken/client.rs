//! Kraken implementation of the [`Exchange`] trait

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::messages::{entry_for_pair, minimum_for_method, parse_field};
use super::rest::KrakenRestClient;
use crate::common::errors::{Error, Result};
use crate::common::traits::Exchange;
use crate::common::types::{
    FeeSchedule, OrderConfirmation, OrderSpec, PairConstraints, Quote, WithdrawalQuote,
};
use crate::config::types::KrakenConfig;

/// Kraken client answering the calculator's market data queries
#[derive(Debug, Clone)]
pub struct KrakenClient {
    rest_client: KrakenRestClient,
}

impl KrakenClient {
    /// Create a new Kraken client from configuration
    pub fn new(config: &KrakenConfig) -> Result<Self> {
        let rest_client = KrakenRestClient::with_timeout(
            &config.rest_url,
            Duration::from_secs(config.request_timeout_seconds),
        )?;

        let rest_client = match config.credentials() {
            Some(creds) => rest_client.with_credentials(creds),
            None => rest_client,
        };

        Ok(Self { rest_client })
    }

    /// Get a reference to the REST client
    pub fn rest(&self) -> &KrakenRestClient {
        &self.rest_client
    }
}

#[async_trait]
impl Exchange for KrakenClient {
    #[instrument(skip(self))]
    async fn pair_constraints(&self, pair: &str) -> Result<PairConstraints> {
        let info = self.rest_client.get_asset_pair(pair).await?;
        let ordermin = info
            .ordermin
            .as_deref()
            .ok_or_else(|| Error::InvalidResponse(format!("No ordermin for pair {}", pair)))?;

        Ok(PairConstraints {
            minimum_volume: parse_field(ordermin, "ordermin")?,
            price_decimals: info.pair_decimals,
        })
    }

    #[instrument(skip(self))]
    async fn fee_schedule(&self, pair: &str) -> Result<FeeSchedule> {
        let volume = self.rest_client.get_trade_volume(pair).await?;

        let taker = volume
            .fees
            .ok_or_else(|| Error::InvalidResponse(format!("No taker fees for pair {}", pair)))?;
        let taker_percent = parse_field(&entry_for_pair(taker, pair)?.fee, "taker fee")?;

        // Pairs without a separate maker schedule charge the taker fee to both
        let maker_percent = match volume.fees_maker {
            Some(maker) => parse_field(&entry_for_pair(maker, pair)?.fee, "maker fee")?,
            None => taker_percent,
        };

        Ok(FeeSchedule {
            maker_percent,
            taker_percent,
        })
    }

    #[instrument(skip(self))]
    async fn quote(&self, pair: &str) -> Result<Quote> {
        let ticker = self.rest_client.get_ticker(pair).await?;
        Ok(Quote::new(ticker.best_bid()?, ticker.best_ask()?))
    }

    #[instrument(skip(self))]
    async fn withdrawal_quote(
        &self,
        asset: &str,
        key: &str,
        amount: Option<Decimal>,
    ) -> Result<WithdrawalQuote> {
        let methods = self.rest_client.get_withdraw_methods(asset).await?;
        let lowest_minimum = methods
            .iter()
            .map(|m| parse_field(&m.minimum, "withdrawal minimum"))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .min()
            .ok_or_else(|| Error::InvalidResponse(format!("No withdrawal methods for asset {}", asset)))?;

        // The key decides the method, and only WithdrawInfo reveals which one
        let requested = amount.filter(|a| !a.is_zero());
        let quoted_amount = requested.unwrap_or(lowest_minimum);
        let mut info = self
            .rest_client
            .get_withdraw_info(asset, key, quoted_amount)
            .await?;
        let minimum = minimum_for_method(&methods, &info.method)?;
        debug!("Key '{}' withdraws {} via {} (minimum {})", key, asset, info.method, minimum);

        if requested.is_none() && minimum != quoted_amount {
            info = self.rest_client.get_withdraw_info(asset, key, minimum).await?;
        }

        Ok(WithdrawalQuote {
            fee: parse_field(&info.fee, "withdrawal fee")?,
            minimum,
        })
    }

    #[instrument(skip(self, order), fields(order = %order))]
    async fn submit_order(&self, order: &OrderSpec) -> Result<OrderConfirmation> {
        let response = self.rest_client.add_order(order).await?;
        info!(
            "Kraken accepted order '{}' with txids {:?}",
            response.descr.order, response.txid
        );

        Ok(OrderConfirmation {
            description: response.descr.order,
            txids: response.txid,
        })
    }

    #[instrument(skip(self))]
    async fn submit_withdrawal(&self, asset: &str, key: &str, amount: Decimal) -> Result<String> {
        let response = self.rest_client.withdraw(asset, key, amount).await?;
        info!("Kraken accepted withdrawal with reference {}", response.refid);
        Ok(response.refid)
    }

    fn exchange_name(&self) -> &'static str {
        "Kraken"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = KrakenClient::new(&KrakenConfig::default());
        assert!(client.is_ok());
        assert!(!client.unwrap().rest().has_credentials());
    }

    #[test]
    fn test_client_picks_up_credentials() {
        let config = KrakenConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("c2VjcmV0".to_string()),
            ..KrakenConfig::default()
        };
        let client = KrakenClient::new(&config).unwrap();
        assert!(client.rest().has_credentials());
        assert_eq!(client.exchange_name(), "Kraken");
    }
}
