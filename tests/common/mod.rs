//! Common test utilities and fixtures

#![allow(dead_code)]

use automate_crypto::config::KrakenConfig;
use automate_crypto::KrakenClient;
use wiremock::MockServer;

/// API key sent by every test client
pub const API_KEY: &str = "test-api-key";

/// A valid base64 secret
pub const API_SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

/// Kraken client with credentials, talking to the mock server
pub fn kraken_client(server: &MockServer) -> KrakenClient {
    let config = KrakenConfig {
        api_key: Some(API_KEY.to_string()),
        api_secret: Some(API_SECRET.to_string()),
        rest_url: server.uri(),
        request_timeout_seconds: 5,
    };
    KrakenClient::new(&config).expect("Failed to create Kraken client")
}

/// Sample Kraken REST responses
pub mod responses {
    pub const ASSET_PAIRS: &str = r#"{
        "error": [],
        "result": {
            "XXBTZUSD": {
                "altname": "XBTUSD",
                "wsname": "XBT/USD",
                "aclass_base": "currency",
                "base": "XXBT",
                "aclass_quote": "currency",
                "quote": "ZUSD",
                "lot": "unit",
                "cost_decimals": 5,
                "pair_decimals": 1,
                "lot_decimals": 8,
                "lot_multiplier": 1,
                "fee_volume_currency": "ZUSD",
                "margin_call": 80,
                "margin_stop": 40,
                "ordermin": "0.0001",
                "costmin": "0.5",
                "tick_size": "0.1",
                "status": "online"
            }
        }
    }"#;

    pub const TICKER: &str = r#"{
        "error": [],
        "result": {
            "XXBTZUSD": {
                "a": ["30000.10000", "1", "1.000"],
                "b": ["30000.00000", "2", "2.000"],
                "c": ["30000.00000", "0.00100000"],
                "v": ["1234.5", "2345.6"],
                "p": ["29950.1", "29900.2"],
                "t": [10000, 20000],
                "l": ["29500.0", "29400.0"],
                "h": ["30100.0", "30200.0"],
                "o": "29800.0"
            }
        }
    }"#;

    pub const TRADE_VOLUME: &str = r#"{
        "error": [],
        "result": {
            "currency": "ZUSD",
            "volume": "2870.1873",
            "fees": {
                "XXBTZUSD": {
                    "fee": "0.2600",
                    "minfee": "0.1000",
                    "maxfee": "0.2600",
                    "nextfee": "0.2400",
                    "nextvolume": "50000.0000",
                    "tiervolume": "0.0000"
                }
            },
            "fees_maker": {
                "XXBTZUSD": {
                    "fee": "0.1600",
                    "minfee": "0.0000",
                    "maxfee": "0.1600",
                    "nextfee": "0.1400",
                    "nextvolume": "50000.0000",
                    "tiervolume": "0.0000"
                }
            }
        }
    }"#;

    pub const TRADE_VOLUME_TAKER_ONLY: &str = r#"{
        "error": [],
        "result": {
            "currency": "ZUSD",
            "volume": "0.0000",
            "fees": {
                "XXBTZUSD": {"fee": "0.2600"}
            }
        }
    }"#;

    pub const ADD_ORDER: &str = r#"{
        "error": [],
        "result": {
            "descr": {"order": "buy 0.00332966 XBTUSD @ limit 29985.0"},
            "txid": ["OUF4EM-FRGI2-MQMWZD"]
        }
    }"#;

    pub const ADD_ORDER_VALIDATED: &str = r#"{
        "error": [],
        "result": {
            "descr": {"order": "buy 0.00332465 XBTUSD @ market"}
        }
    }"#;

    pub const WITHDRAW_METHODS: &str = r#"{
        "error": [],
        "result": [
            {"asset": "XXBT", "method": "Bitcoin", "network": "Bitcoin", "minimum": "0.0004"},
            {"asset": "XXBT", "method": "Bitcoin Lightning", "network": "Lightning", "minimum": "0.00002"}
        ]
    }"#;

    pub const WITHDRAW_INFO: &str = r#"{
        "error": [],
        "result": {
            "method": "Bitcoin",
            "limit": "332.00956139",
            "amount": "0.00685",
            "fee": "0.00015"
        }
    }"#;

    pub const WITHDRAW_INFO_UNLISTED_METHOD: &str = r#"{
        "error": [],
        "result": {
            "method": "Bitcoin Taproot",
            "limit": "332.00956139",
            "amount": "0.00685",
            "fee": "0.00015"
        }
    }"#;

    pub const WITHDRAW: &str = r#"{
        "error": [],
        "result": {"refid": "FTQcuak-V6Za8qrWnhzTx67yYHz8Tg"}
    }"#;

    pub const UNKNOWN_PAIR: &str = r#"{"error": ["EQuery:Unknown asset pair"]}"#;

    pub const INVALID_KEY: &str = r#"{"error": ["EAPI:Invalid key"]}"#;
}
