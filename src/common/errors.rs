//! Error types for the application

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for calculations and exchange operations
#[derive(Error, Debug)]
pub enum Error {
    /// A quantization call received neither a decimal nor a decimal string
    #[error("Invalid input type for quantization: expected a decimal or a decimal string, got {0}")]
    InvalidInputType(&'static str),

    /// A string could not be parsed as a decimal
    #[error("Invalid decimal '{input}': {reason}")]
    InvalidDecimal { input: String, reason: String },

    /// A quantized value needs more significant digits than the context allows
    #[error("Quantizing {value} to {scale} decimal places exceeds the precision of {precision} significant digits")]
    PrecisionExceeded {
        value: Decimal,
        scale: u32,
        precision: u32,
    },

    /// Order type is neither limit nor market
    #[error("Unsupported order type '{0}', expected 'limit' or 'market'")]
    UnsupportedOrderType(String),

    /// Computed volume is below the exchange minimum for the pair
    #[error("Minimum order volume is {minimum}, but the computed volume is only {volume}")]
    MinimumVolumeNotMet { minimum: Decimal, volume: Decimal },

    /// An amount that must be strictly positive was not
    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    /// A price that must be strictly positive was not
    #[error("Price must be greater than zero, got {0}")]
    InvalidPrice(Decimal),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Errors reported by the exchange in its response envelope
    #[error("Exchange returned errors: {}", .0.join(", "))]
    Exchange(Vec<String>),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Trading pair not found
    #[error("Trading pair not found: {0}")]
    PairNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minimum_volume_message_carries_both_values() {
        let err = Error::MinimumVolumeNotMet {
            minimum: dec!(0.0001),
            volume: dec!(0.00003329),
        };
        let message = err.to_string();
        assert!(message.contains("0.0001"));
        assert!(message.contains("0.00003329"));
    }

    #[test]
    fn test_exchange_errors_are_joined() {
        let err = Error::Exchange(vec![
            "EGeneral:Invalid arguments".to_string(),
            "EOrder:Insufficient funds".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Exchange returned errors: EGeneral:Invalid arguments, EOrder:Insufficient funds"
        );
    }
}
