use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::inputs::{IncomeLine, UnitMixEntry};
use crate::types::Money;

/// Which rent column of the unit mix drives a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RentScenario {
    Current,
    Market,
}

/// Monthly income totals for one rent scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub gross_rental_income: Money,
    pub other_income: Money,
    pub total_gross_income: Money,
}

/// Sum of rent × unit count over the unit mix, using the scenario's rent.
pub fn gross_rental_income(unit_mix: &[UnitMixEntry], scenario: RentScenario) -> Money {
    unit_mix
        .iter()
        .map(|unit| {
            let rent = match scenario {
                RentScenario::Current => unit.current_rent,
                RentScenario::Market => unit.market_rent,
            };
            rent * Decimal::from(unit.unit_count)
        })
        .sum()
}

/// Flat income lines, skipping rent rollups flagged as calculated.
pub fn other_income(lines: &[IncomeLine]) -> Money {
    lines
        .iter()
        .filter(|line| !line.is_calculated)
        .map(|line| line.amount)
        .sum()
}

pub fn summarize_income(
    unit_mix: &[UnitMixEntry],
    lines: &[IncomeLine],
    scenario: RentScenario,
) -> IncomeSummary {
    let gross_rental_income = gross_rental_income(unit_mix, scenario);
    let other_income = other_income(lines);
    IncomeSummary {
        gross_rental_income,
        other_income,
        total_gross_income: gross_rental_income + other_income,
    }
}
