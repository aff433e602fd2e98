//! Authentication utilities for the Kraken REST API

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::errors::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Generate the `API-Sign` value for a private request
///
/// `base64(HMAC-SHA512(base64_decode(secret), path || SHA256(nonce || post_data)))`
///
/// # Arguments
/// * `secret` - API secret (base64 encoded)
/// * `path` - URI path, e.g. `/0/private/AddOrder`
/// * `nonce` - The nonce also sent in the body
/// * `post_data` - The url-encoded body, nonce included
pub fn sign_request(secret: &str, path: &str, nonce: u64, post_data: &str) -> Result<String> {
    let secret_bytes = BASE64
        .decode(secret)
        .map_err(|e| Error::Authentication(format!("Failed to decode secret: {}", e)))?;

    let mut sha = Sha256::new();
    sha.update(nonce.to_string().as_bytes());
    sha.update(post_data.as_bytes());
    let digest = sha.finalize();

    let mut mac = HmacSha512::new_from_slice(&secret_bytes)
        .map_err(|e| Error::Authentication(format!("Failed to create HMAC: {}", e)))?;
    mac.update(path.as_bytes());
    mac.update(&digest);

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Strictly increasing nonces derived from the clock in milliseconds
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next nonce, never equal to or below a previous one
    pub fn next(&self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// Authentication headers for a private request
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub signature: String,
}

impl AuthHeaders {
    pub fn new(api_key: &str, api_secret: &str, path: &str, nonce: u64, post_data: &str) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            signature: sign_request(api_secret, path, nonce, post_data)?,
        })
    }

    /// Add authentication headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("API-Key", &self.api_key)
            .header("API-Sign", &self.signature)
    }
}
