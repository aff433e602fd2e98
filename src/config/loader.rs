//! Configuration loader

use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

use super::types::AppConfig;
use crate::common::errors::{Error, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with AUTOMATE_CRYPTO__)
/// 2. Configuration file (TOML format), skipped when missing
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("AUTOMATE_CRYPTO")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| Error::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| Error::Configuration(e.to_string()))
}

/// Parse configuration from a TOML string
pub fn load_config_str(toml: &str) -> Result<AppConfig> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|e| Error::Configuration(e.to_string()))
}

/// Load the configured env file and pick up Kraken credentials
///
/// A missing env file is not an error; the variables may already be set.
/// `KRAKEN_API_KEY` and `KRAKEN_API_SECRET` only fill values the config
/// file left unset.
pub fn apply_env(config: &mut AppConfig) {
    let env_file = config.settings.env_file_path();
    match dotenvy::from_path(&env_file) {
        Ok(()) => debug!("Loaded environment from {}", env_file.display()),
        Err(e) => debug!("No environment loaded from {}: {}", env_file.display(), e),
    }

    if config.kraken.api_key.is_none() {
        config.kraken.api_key = std::env::var("KRAKEN_API_KEY").ok();
    }
    if config.kraken.api_secret.is_none() {
        config.kraken.api_secret = std::env::var("KRAKEN_API_SECRET").ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::Rounding;

    #[test]
    fn test_load_full_config() {
        let config = load_config_str(
            r#"
            [automate-crypto]
            env_file = "secrets.env"
            logging_path = ""

            [decimal]
            precision = 20
            rounding = "half_even"
            scale = 6

            [kraken]
            rest_url = "http://localhost:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.env_file, "secrets.env");
        assert_eq!(
            config.settings.logging_file_path(),
            std::path::PathBuf::from("automate_crypto.log")
        );
        assert_eq!(config.decimal.precision, 20);
        assert_eq!(config.decimal.rounding, Rounding::HalfEven);
        assert_eq!(config.decimal.scale, 6);
        assert_eq!(config.kraken.rest_url, "http://localhost:8080");
        assert_eq!(config.kraken.request_timeout_seconds, 30);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_str("").unwrap();
        assert_eq!(config.settings.env_file, ".env");
        assert_eq!(config.decimal.precision, 16);
        assert_eq!(config.decimal.rounding, Rounding::Floor);
        assert_eq!(config.kraken.rest_url, "https://api.kraken.com");
    }

    #[test]
    fn test_missing_config_file_is_fine() {
        let config = load_config(Some("does/not/exist.toml")).unwrap();
        assert_eq!(config.decimal.scale, 8);
    }

    #[test]
    fn test_invalid_rounding_is_a_configuration_error() {
        let err = load_config_str("[decimal]\nrounding = \"sideways\"").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
