//! Starting values for a new analysis.
//!
//! These are form defaults only. The calculator never reads them; callers
//! seed a request from them and let the user edit before analysing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::{ExpenseLine, PercentageBasis, PropertyInputs, UnitMixEntry};
use crate::error::DealAnalysisError;
use crate::types::{percent_to_rate, Money, Percent};
use crate::AnalysisResult;

const MAX_LOAN_TERM_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisDefaults {
    pub down_payment_percent: Percent,
    pub interest_rate: Percent,
    pub loan_term_years: u32,
    /// Market rent proposed for a new unit-mix row, as a premium over its
    /// current rent
    pub market_rent_premium_percent: Percent,
    pub expenses: Vec<ExpenseLine>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        AnalysisDefaults {
            down_payment_percent: dec!(25),
            interest_rate: dec!(7),
            loan_term_years: 30,
            market_rent_premium_percent: dec!(10),
            expenses: vec![
                ExpenseLine::percentage("Vacancy", dec!(5), PercentageBasis::Rent),
                ExpenseLine::percentage("Property Management", dec!(8), PercentageBasis::Rent),
                ExpenseLine::percentage("Property Taxes", dec!(1.2), PercentageBasis::PropertyValue),
                ExpenseLine::percentage("Insurance", dec!(0.5), PercentageBasis::PropertyValue),
                ExpenseLine::percentage("Repairs & Maintenance", dec!(5), PercentageBasis::Income),
                ExpenseLine::percentage("Capital Reserves", dec!(3), PercentageBasis::Income),
            ],
        }
    }
}

impl AnalysisDefaults {
    /// Parse defaults from JSON. Missing fields take the built-in values.
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        let defaults: AnalysisDefaults = serde_json::from_str(json)?;
        defaults.validate()?;
        Ok(defaults)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        check_percent("down_payment_percent", self.down_payment_percent)?;
        check_percent("interest_rate", self.interest_rate)?;
        check_percent("market_rent_premium_percent", self.market_rent_premium_percent)?;

        if self.loan_term_years > MAX_LOAN_TERM_YEARS {
            return Err(DealAnalysisError::InvalidInput {
                field: "loan_term_years".into(),
                reason: format!("Loan term must not exceed {MAX_LOAN_TERM_YEARS} years"),
            });
        }

        for line in &self.expenses {
            if line.is_percentage {
                check_percent(&format!("expenses.{}", line.name), line.amount)?;
            } else if line.amount < Decimal::ZERO {
                return Err(DealAnalysisError::InvalidInput {
                    field: format!("expenses.{}", line.name),
                    reason: "Flat expense must not be negative".into(),
                });
            }
        }

        Ok(())
    }

    /// Financing terms for a property at `purchase_price`.
    pub fn seed_property(&self, purchase_price: Money) -> PropertyInputs {
        PropertyInputs {
            purchase_price,
            down_payment: purchase_price * percent_to_rate(self.down_payment_percent),
            loan_term_years: self.loan_term_years,
            interest_rate: self.interest_rate,
            is_cash_purchase: false,
        }
    }

    /// A unit-mix row whose market rent carries the default premium.
    pub fn seed_unit(&self, unit_type: impl Into<String>, unit_count: u32, current_rent: Money) -> UnitMixEntry {
        UnitMixEntry {
            unit_type: unit_type.into(),
            unit_count,
            current_rent,
            market_rent: current_rent * (Decimal::ONE + percent_to_rate(self.market_rent_premium_percent)),
        }
    }
}

fn check_percent(field: &str, value: Percent) -> AnalysisResult<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(DealAnalysisError::InvalidInput {
            field: field.into(),
            reason: format!("Percentage {value} must be between 0 and 100"),
        });
    }
    Ok(())
}
