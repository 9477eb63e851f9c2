use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Acquisition and financing terms for a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInputs {
    /// Contract purchase price
    pub purchase_price: Money,
    /// Cash put down at closing (equals the price for cash purchases)
    pub down_payment: Money,
    /// Loan term in whole years (0 for cash purchases)
    #[serde(default)]
    pub loan_term_years: u32,
    /// Nominal annual interest rate as a whole percentage (6.5 = 6.5%)
    #[serde(default)]
    pub interest_rate: Percent,
    #[serde(default)]
    pub is_cash_purchase: bool,
}

/// One row of the unit mix: a group of identical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMixEntry {
    /// Label such as "1BR/1BA"
    pub unit_type: String,
    pub unit_count: u32,
    /// In-place monthly rent per unit
    pub current_rent: Money,
    /// Achievable monthly rent per unit
    pub market_rent: Money,
}

/// A flat monthly income line (parking, laundry, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeLine {
    pub name: String,
    /// Monthly amount
    pub amount: Money,
    /// Rollup of unit-mix rent. Excluded from other income so rent is not
    /// counted twice.
    #[serde(default)]
    pub is_calculated: bool,
}

/// What a percentage-based expense is a percentage of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PercentageBasis {
    /// Gross rental income of the active scenario
    #[default]
    Rent,
    /// Total gross income (rent plus other income)
    Income,
    /// Purchase price, spread over twelve months
    PropertyValue,
}

/// A monthly operating expense, either flat dollars or a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLine {
    pub name: String,
    /// Monthly dollars, or a whole percentage when `is_percentage` is set
    pub amount: Decimal,
    #[serde(default)]
    pub is_percentage: bool,
    #[serde(default)]
    pub percentage_basis: PercentageBasis,
}

impl ExpenseLine {
    pub fn flat(name: impl Into<String>, monthly_amount: Money) -> Self {
        ExpenseLine {
            name: name.into(),
            amount: monthly_amount,
            is_percentage: false,
            percentage_basis: PercentageBasis::default(),
        }
    }

    pub fn percentage(name: impl Into<String>, percent: Percent, basis: PercentageBasis) -> Self {
        ExpenseLine {
            name: name.into(),
            amount: percent,
            is_percentage: true,
            percentage_basis: basis,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Apply the cash-purchase invariant: no term, no rate, and the whole price
/// as down payment. Financed inputs pass through untouched, including
/// out-of-range values.
pub fn normalize(inputs: &PropertyInputs) -> PropertyInputs {
    if inputs.is_cash_purchase {
        PropertyInputs {
            purchase_price: inputs.purchase_price,
            down_payment: inputs.purchase_price,
            loan_term_years: 0,
            interest_rate: Decimal::ZERO,
            is_cash_purchase: true,
        }
    } else {
        inputs.clone()
    }
}

impl PropertyInputs {
    /// Financed amount. Negative when the down payment exceeds the price.
    pub fn loan_amount(&self) -> Money {
        if self.is_cash_purchase {
            return Decimal::ZERO;
        }
        self.purchase_price - self.down_payment
    }

    /// Cash actually invested: the down payment, or the full price for a
    /// cash purchase.
    pub fn total_investment(&self) -> Money {
        if self.is_cash_purchase {
            self.purchase_price
        } else {
            self.down_payment
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn financed() -> PropertyInputs {
        PropertyInputs {
            purchase_price: dec!(1000000),
            down_payment: dec!(200000),
            loan_term_years: 30,
            interest_rate: dec!(6.5),
            is_cash_purchase: false,
        }
    }

    #[test]
    fn test_cash_purchase_is_forced() {
        let mut input = financed();
        input.is_cash_purchase = true;
        let norm = normalize(&input);

        assert_eq!(norm.down_payment, dec!(1000000));
        assert_eq!(norm.loan_term_years, 0);
        assert_eq!(norm.interest_rate, Decimal::ZERO);
        assert_eq!(norm.loan_amount(), Decimal::ZERO);
        assert_eq!(norm.total_investment(), dec!(1000000));
    }

    #[test]
    fn test_financed_passes_through() {
        let input = financed();
        assert_eq!(normalize(&input), input);
        assert_eq!(input.loan_amount(), dec!(800000));
        assert_eq!(input.total_investment(), dec!(200000));
    }

    #[test]
    fn test_down_payment_above_price_not_rejected() {
        let mut input = financed();
        input.down_payment = dec!(1200000);
        let norm = normalize(&input);
        assert_eq!(norm.loan_amount(), dec!(-200000));
    }

    #[test]
    fn test_expense_line_deserializes_form_payload() {
        let line: ExpenseLine = serde_json::from_str(
            r#"{"name":"Taxes","amount":"1.2","isPercentage":true,"percentageBasis":"propertyValue"}"#,
        )
        .unwrap();
        assert_eq!(
            line,
            ExpenseLine::percentage("Taxes", dec!(1.2), PercentageBasis::PropertyValue)
        );
    }
}
