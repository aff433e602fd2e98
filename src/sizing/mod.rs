//! Order sizing and fee adjustment
//!
//! Pure, synchronous calculations that turn a fiat budget or a crypto amount
//! into an order or a withdrawal. Nothing in here performs I/O; market data
//! comes in as plain values and every result is quantized.
//!
//! # Pipeline
//!
//! ```text
//!  Quote ─┐
//!         ├─► resolve_price ─┐
//!  Pair  ─┘                  │
//!                            ├─► size_order ─► ensure_minimum_volume ─► fee_currency_flag ─► OrderSpec
//!  Fees ──► fee_fraction ────┘
//!
//!  WithdrawalQuote ─► assess_withdrawal ─► WithdrawalSpec (proceed | blocked)
//! ```
//!
//! # Example
//!
//! ```
//! use automate_crypto::sizing::{QuantizationContext, size_order};
//! use rust_decimal_macros::dec;
//!
//! let ctx = QuantizationContext::default();
//! let sizing = size_order(&ctx, dec!(100.00), dec!(0.0016), dec!(29985.00)).unwrap();
//! assert_eq!(sizing.fee_paid + sizing.net_fiat, dec!(100.00));
//! assert_eq!(sizing.volume, dec!(0.00332966));
//! ```

mod fees;
mod order;
mod price;
mod quantize;
mod withdrawal;

pub use quantize::{
    parse_decimal, quantize, DecimalInput, QuantizationContext, Rounding, DEFAULT_PRECISION,
    DEFAULT_SCALE,
};

pub use price::{resolve_price, LimitPricing, DEFAULT_LIMIT_PERCENTAGE};

pub use fees::{fee_currency_flag, fee_fraction, FEE_CURRENCY_CRYPTO, FEE_CURRENCY_FIAT};

pub use order::{
    ensure_minimum_volume, plan_order, size_order, MarketSnapshot, OrderPlan, OrderRequest, Sizing,
};

pub use withdrawal::{assess_withdrawal, DEFAULT_MAX_FEE_PERCENT};
