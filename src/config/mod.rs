//! Configuration module

pub mod loader;
pub mod types;

pub use loader::{apply_env, load_config, load_config_str};
pub use types::{ApiCredentials, AppConfig, AppSettings, DecimalConfig, KrakenConfig};
