//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::errors::Result;
use crate::sizing::{QuantizationContext, Rounding, DEFAULT_PRECISION, DEFAULT_SCALE};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// File locations
    #[serde(rename = "automate-crypto", default)]
    pub settings: AppSettings,
    /// Decimal precision and rounding
    #[serde(default)]
    pub decimal: DecimalConfig,
    /// Kraken-specific configuration
    #[serde(default)]
    pub kraken: KrakenConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Dotenv file holding the API credentials
    #[serde(default = "default_env_file")]
    pub env_file: String,
    /// File the log is appended to
    #[serde(default = "default_logging_path")]
    pub logging_path: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            logging_path: default_logging_path(),
        }
    }
}

impl AppSettings {
    /// Env file path, with an empty setting meaning the default
    pub fn env_file_path(&self) -> PathBuf {
        non_empty_or(&self.env_file, default_env_file)
    }

    /// Log file path, with an empty setting meaning the default
    pub fn logging_file_path(&self) -> PathBuf {
        non_empty_or(&self.logging_path, default_logging_path)
    }
}

fn non_empty_or(value: &str, default: fn() -> String) -> PathBuf {
    if value.trim().is_empty() {
        PathBuf::from(default())
    } else {
        PathBuf::from(value)
    }
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_logging_path() -> String {
    "automate_crypto.log".to_string()
}

/// Decimal arithmetic settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecimalConfig {
    /// Significant digits kept by intermediate arithmetic
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Rounding rule
    #[serde(default)]
    pub rounding: Rounding,
    /// Fractional digits of every quantized value
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for DecimalConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            rounding: Rounding::default(),
            scale: default_scale(),
        }
    }
}

impl DecimalConfig {
    /// Build the quantization context for this run
    pub fn context(&self) -> Result<QuantizationContext> {
        QuantizationContext::new(self.precision, self.rounding, self.scale)
    }
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

fn default_scale() -> u32 {
    DEFAULT_SCALE
}

/// Kraken platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KrakenConfig {
    /// API key for private endpoints
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base64 API secret for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the REST API
    #[serde(default = "default_kraken_rest_url")]
    pub rest_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for KrakenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            rest_url: default_kraken_rest_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl KrakenConfig {
    /// Credentials, when both key and secret are set
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(ApiCredentials::new(key.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

fn default_kraken_rest_url() -> String {
    "https://api.kraken.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// API credentials for private requests
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
