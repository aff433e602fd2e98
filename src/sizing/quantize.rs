//! Fixed-point quantization
//!
//! Every value that feeds an order or a withdrawal passes through a
//! [`QuantizationContext`] before it takes part in further arithmetic. The
//! context is an ordinary value handed to each calculation, so two runs with
//! the same context and inputs produce identical outputs.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::errors::{Error, Result};

/// Default number of significant digits kept by intermediate arithmetic
pub const DEFAULT_PRECISION: u32 = 16;

/// Default number of fractional digits (a step of 1e-8)
pub const DEFAULT_SCALE: u32 = 8;

/// Largest scale and precision a `Decimal` can represent
const MAX_DIGITS: u32 = 28;

/// Rounding rule applied by quantization and intermediate arithmetic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Toward negative infinity
    #[default]
    Floor,
    /// Toward positive infinity
    Ceiling,
    /// Toward zero
    Down,
    /// Away from zero
    Up,
    /// Nearest, ties away from zero
    HalfUp,
    /// Nearest, ties toward zero
    HalfDown,
    /// Nearest, ties to even
    HalfEven,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::Floor => RoundingStrategy::ToNegativeInfinity,
            Rounding::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Rounding::Down => RoundingStrategy::ToZero,
            Rounding::Up => RoundingStrategy::AwayFromZero,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfDown => RoundingStrategy::MidpointTowardZero,
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Input accepted by the quantizer
///
/// Binary floats and other JSON values are carried as `Unsupported` so the
/// quantizer can reject them instead of silently inheriting float error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalInput<'a> {
    Decimal(Decimal),
    Text(&'a str),
    Unsupported(&'static str),
}

impl From<Decimal> for DecimalInput<'_> {
    fn from(value: Decimal) -> Self {
        DecimalInput::Decimal(value)
    }
}

impl From<&Decimal> for DecimalInput<'_> {
    fn from(value: &Decimal) -> Self {
        DecimalInput::Decimal(*value)
    }
}

impl<'a> From<&'a str> for DecimalInput<'a> {
    fn from(value: &'a str) -> Self {
        DecimalInput::Text(value)
    }
}

impl<'a> From<&'a String> for DecimalInput<'a> {
    fn from(value: &'a String) -> Self {
        DecimalInput::Text(value.as_str())
    }
}

impl From<f64> for DecimalInput<'_> {
    fn from(_: f64) -> Self {
        DecimalInput::Unsupported("f64")
    }
}

impl From<f32> for DecimalInput<'_> {
    fn from(_: f32) -> Self {
        DecimalInput::Unsupported("f32")
    }
}

impl<'a> From<&'a serde_json::Value> for DecimalInput<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => DecimalInput::Text(s.as_str()),
            serde_json::Value::Number(_) => DecimalInput::Unsupported("JSON number"),
            serde_json::Value::Null => DecimalInput::Unsupported("JSON null"),
            serde_json::Value::Bool(_) => DecimalInput::Unsupported("JSON bool"),
            serde_json::Value::Array(_) => DecimalInput::Unsupported("JSON array"),
            serde_json::Value::Object(_) => DecimalInput::Unsupported("JSON object"),
        }
    }
}

/// Parse a decimal-formatted string
///
/// Plain notation (`"0.00015"`) and scientific notation (`"1e-8"`) are both
/// accepted.
pub fn parse_decimal(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    parsed.map_err(|e| Error::InvalidDecimal {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Precision, rounding and scale for every calculation in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationContext {
    precision: u32,
    rounding: Rounding,
    scale: u32,
}

impl Default for QuantizationContext {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            rounding: Rounding::Floor,
            scale: DEFAULT_SCALE,
        }
    }
}

impl QuantizationContext {
    /// Create a context
    ///
    /// # Arguments
    /// * `precision` - Significant digits kept by intermediate arithmetic (1..=28)
    /// * `rounding` - Rounding rule for quantization and arithmetic
    /// * `scale` - Fractional digits of the fixed-point step (0..=28)
    pub fn new(precision: u32, rounding: Rounding, scale: u32) -> Result<Self> {
        if precision == 0 || precision > MAX_DIGITS {
            return Err(Error::Configuration(format!(
                "decimal precision must be between 1 and {}, got {}",
                MAX_DIGITS, precision
            )));
        }
        if scale > MAX_DIGITS {
            return Err(Error::Configuration(format!(
                "decimal scale must be at most {}, got {}",
                MAX_DIGITS, scale
            )));
        }
        Ok(Self {
            precision,
            rounding,
            scale,
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The fixed-point step, e.g. `0.00000001` for a scale of 8
    pub fn step(&self) -> Decimal {
        Decimal::new(1, self.scale)
    }

    /// Quantize to the context scale
    pub fn quantize<'a>(&self, value: impl Into<DecimalInput<'a>>) -> Result<Decimal> {
        self.quantize_to(value, self.scale)
    }

    /// Quantize to an explicit number of fractional digits
    ///
    /// The result always carries exactly `scale` fractional digits, so
    /// `100` quantized to 2 digits prints as `100.00`.
    pub fn quantize_to<'a>(&self, value: impl Into<DecimalInput<'a>>, scale: u32) -> Result<Decimal> {
        let value = match value.into() {
            DecimalInput::Decimal(d) => d,
            DecimalInput::Text(s) => parse_decimal(s)?,
            DecimalInput::Unsupported(kind) => return Err(Error::InvalidInputType(kind)),
        };
        if scale > MAX_DIGITS {
            return Err(Error::Configuration(format!(
                "cannot quantize to {} decimal places",
                scale
            )));
        }

        let mut quantized = value.round_dp_with_strategy(scale, self.rounding.strategy());
        quantized.rescale(scale);

        if significant_digits(&quantized) > self.precision || quantized.scale() != scale {
            return Err(Error::PrecisionExceeded {
                value,
                scale,
                precision: self.precision,
            });
        }
        Ok(quantized)
    }

    /// Multiply, keeping `precision` significant digits
    pub fn mul(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
        let product = lhs
            .checked_mul(rhs)
            .ok_or_else(|| Error::Internal(format!("overflow multiplying {} by {}", lhs, rhs)))?;
        self.round_significant(product)
    }

    /// Divide, keeping `precision` significant digits
    pub fn div(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
        if rhs.is_zero() {
            return Err(Error::Internal(format!("division of {} by zero", lhs)));
        }
        let quotient = lhs
            .checked_div(rhs)
            .ok_or_else(|| Error::Internal(format!("overflow dividing {} by {}", lhs, rhs)))?;
        self.round_significant(quotient)
    }

    fn round_significant(&self, value: Decimal) -> Result<Decimal> {
        if value.is_zero() {
            return Ok(value);
        }
        value
            .round_sf_with_strategy(self.precision, self.rounding.strategy())
            .ok_or_else(|| {
                Error::Internal(format!(
                    "cannot round {} to {} significant digits",
                    value, self.precision
                ))
            })
    }
}

/// Quantize `value` to `scale` fractional digits under `ctx`
pub fn quantize<'a>(
    ctx: &QuantizationContext,
    value: impl Into<DecimalInput<'a>>,
    scale: u32,
) -> Result<Decimal> {
    ctx.quantize_to(value, scale)
}

/// Digits in the coefficient, trailing zeros included
fn significant_digits(value: &Decimal) -> u32 {
    let mut mantissa = value.mantissa().unsigned_abs();
    let mut digits = 1;
    while mantissa >= 10 {
        mantissa /= 10;
        digits += 1;
    }
    digits
}
