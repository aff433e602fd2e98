//! Kraken module - Client implementation for the Kraken REST API

pub mod auth;
pub mod client;
pub mod messages;
pub mod rest;

pub use client::KrakenClient;
pub use rest::KrakenRestClient;
