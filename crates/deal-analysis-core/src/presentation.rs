//! Display rounding. Calculations keep full precision; round only here.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Coverage, Money, Rate};

/// Round to cents, half away from zero.
pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal rate as a percentage with two decimals (0.13248 -> 13.25).
pub fn rate_as_percent(rate: Rate) -> Decimal {
    (rate * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-decimal ratio with an `x` suffix, or `∞` when unbounded.
pub fn format_coverage(coverage: &Coverage) -> String {
    match coverage {
        Coverage::Finite(v) => format!(
            "{}x",
            v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Coverage::Unbounded => "∞".to_string(),
    }
}
