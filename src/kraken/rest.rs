//! REST API client for Kraken

use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::{AuthHeaders, NonceGenerator};
use super::messages::*;
use crate::common::errors::{Error, Result};
use crate::common::types::{OrderSpec, OrderType};
use crate::config::types::ApiCredentials;

/// REST API client for Kraken
#[derive(Debug, Clone)]
pub struct KrakenRestClient {
    /// HTTP client
    client: Client,
    /// Base URL, without trailing slash
    base_url: String,
    /// Optional API credentials for private endpoints
    credentials: Option<ApiCredentials>,
    /// Shared so clones never reuse a nonce
    nonces: Arc<NonceGenerator>,
}

impl KrakenRestClient {
    /// Create a new REST client (public endpoints only)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
            nonces: Arc::new(NonceGenerator::new()),
        })
    }

    /// Set API credentials for private requests
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    // ========================================================================
    // Public Endpoints
    // ========================================================================

    /// Get trading constraints for a pair
    #[instrument(skip(self))]
    pub async fn get_asset_pair(&self, pair: &str) -> Result<AssetPairInfo> {
        let pairs: HashMap<String, AssetPairInfo> =
            self.public_get("/0/public/AssetPairs", &[("pair", pair)]).await?;
        entry_for_pair(pairs, pair)
    }

    /// Get ticker information for a pair
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, pair: &str) -> Result<TickerInfo> {
        let tickers: HashMap<String, TickerInfo> =
            self.public_get("/0/public/Ticker", &[("pair", pair)]).await?;
        entry_for_pair(tickers, pair)
    }

    // ========================================================================
    // Private Endpoints
    // ========================================================================

    /// Get the account's 30 day volume and current fees for a pair
    #[instrument(skip(self))]
    pub async fn get_trade_volume(&self, pair: &str) -> Result<TradeVolumeResponse> {
        self.private_post("/0/private/TradeVolume", &[("pair", pair.to_string())])
            .await
    }

    /// Place (or, with the validate flag, only validate) an order
    #[instrument(skip(self, order), fields(order = %order))]
    pub async fn add_order(&self, order: &OrderSpec) -> Result<AddOrderResponse> {
        let mut params = vec![
            ("ordertype", order.order_type().as_str().to_string()),
            ("type", order.side().to_string()),
            ("volume", order.volume().to_string()),
            ("pair", order.pair().to_string()),
        ];
        if order.order_type() == OrderType::Limit {
            params.push(("price", order.price().to_string()));
        }
        if !order.flags().is_empty() {
            let flags: Vec<&str> = order.flags().iter().map(|f| f.as_str()).collect();
            params.push(("oflags", flags.join(",")));
        }
        if order.validate() {
            params.push(("validate", "true".to_string()));
        }

        self.private_post("/0/private/AddOrder", &params).await
    }

    /// Get withdrawal methods, with their minimum amounts, for an asset
    #[instrument(skip(self))]
    pub async fn get_withdraw_methods(&self, asset: &str) -> Result<Vec<WithdrawMethod>> {
        self.private_post("/0/private/WithdrawMethods", &[("asset", asset.to_string())])
            .await
    }

    /// Get the fee for withdrawing `amount` of `asset` to the saved key
    #[instrument(skip(self))]
    pub async fn get_withdraw_info(&self, asset: &str, key: &str, amount: Decimal) -> Result<WithdrawInfoResponse> {
        let params = [
            ("asset", asset.to_string()),
            ("key", key.to_string()),
            ("amount", amount.to_string()),
        ];
        self.private_post("/0/private/WithdrawInfo", &params).await
    }

    /// Request a withdrawal
    #[instrument(skip(self))]
    pub async fn withdraw(&self, asset: &str, key: &str, amount: Decimal) -> Result<WithdrawResponse> {
        let params = [
            ("asset", asset.to_string()),
            ("key", key.to_string()),
            ("amount", amount.to_string()),
        ];
        self.private_post("/0/private/Withdraw", &params).await
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    async fn public_get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        Self::read_envelope(response).await
    }

    async fn private_post<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Authentication("Kraken API credentials are not configured".to_string()))?;

        let nonce = self.nonces.next();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("nonce", &nonce.to_string())
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        let headers = AuthHeaders::new(&creds.api_key, &creds.api_secret, path, nonce, &body)?;

        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = self
            .client
            .post(&url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body(body);
        let response = headers.apply_to_request(request).send().await?;
        Self::read_envelope(response).await
    }

    async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        let envelope: KrakenResponse<T> = serde_json::from_str(&body)?;
        envelope.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = KrakenRestClient::new("https://api.kraken.com");
        assert!(client.is_ok());
        assert!(!client.unwrap().has_credentials());
    }

    #[test]
    fn test_url_normalization() {
        let client = KrakenRestClient::new("https://api.kraken.com/").unwrap();
        assert!(!client.base_url.ends_with('/'));
    }

    #[tokio::test]
    async fn test_private_call_without_credentials() {
        let client = KrakenRestClient::new("http://127.0.0.1:9").unwrap();
        let err = client.get_trade_volume("XXBTZUSD").await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
