use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Used for every computed ratio.
pub type Rate = Decimal;

/// Whole percentages as entered on the analysis form (6.5 = 6.5%).
/// Convert with [`percent_to_rate`] before doing arithmetic.
pub type Percent = Decimal;

/// Multiples (e.g., 7.2x gross rent)
pub type Multiple = Decimal;

/// Convert a whole percentage into a decimal rate.
pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / dec!(100)
}

/// A coverage ratio that is unbounded when there is nothing to cover
/// (no debt service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Finite(Decimal),
    Unbounded,
}

impl Coverage {
    /// `numerator / denominator`, or `Unbounded` when the denominator is zero.
    pub fn ratio(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            Coverage::Unbounded
        } else {
            Coverage::Finite(numerator / denominator)
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Coverage::Unbounded)
    }

    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Coverage::Finite(v) => Some(*v),
            Coverage::Unbounded => None,
        }
    }

    /// Change from `base` to `self`.
    ///
    /// Two unbounded ratios differ by zero; an unbounded ratio on either
    /// side of a finite one yields `Unbounded`.
    pub fn delta(&self, base: &Coverage) -> Coverage {
        match (self, base) {
            (Coverage::Finite(a), Coverage::Finite(b)) => Coverage::Finite(a - b),
            (Coverage::Unbounded, Coverage::Unbounded) => Coverage::Finite(Decimal::ZERO),
            _ => Coverage::Unbounded,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Finite(v) => write!(f, "{v}"),
            Coverage::Unbounded => f.write_str("Infinity"),
        }
    }
}

impl Serialize for Coverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coverage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("infinity") {
            return Ok(Coverage::Unbounded);
        }
        Decimal::from_str(&raw)
            .map(Coverage::Finite)
            .map_err(serde::de::Error::custom)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
