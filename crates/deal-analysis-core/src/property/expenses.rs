use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::income::IncomeSummary;
use super::inputs::{ExpenseLine, PercentageBasis};
use crate::types::{percent_to_rate, Money};

/// The figures percentage-based expenses resolve against, for one rent
/// scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBase {
    pub gross_rental_income: Money,
    pub total_gross_income: Money,
    pub purchase_price: Money,
}

impl ExpenseBase {
    pub fn new(income: &IncomeSummary, purchase_price: Money) -> Self {
        ExpenseBase {
            gross_rental_income: income.gross_rental_income,
            total_gross_income: income.total_gross_income,
            purchase_price,
        }
    }
}

/// An expense line with its monthly dollar amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedExpense {
    pub name: String,
    pub monthly_amount: Money,
    pub annual_amount: Money,
}

/// Resolved expense lines and their monthly total. Debt service is never
/// part of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub lines: Vec<ResolvedExpense>,
    pub total_monthly: Money,
}

/// Monthly dollar amount of a single expense line.
pub fn resolve_expense(line: &ExpenseLine, base: &ExpenseBase) -> Money {
    if !line.is_percentage {
        return line.amount;
    }

    let rate = percent_to_rate(line.amount);
    match line.percentage_basis {
        PercentageBasis::PropertyValue => base.purchase_price * rate / dec!(12),
        PercentageBasis::Rent => base.gross_rental_income * rate,
        PercentageBasis::Income => base.total_gross_income * rate,
    }
}

pub fn resolve_expenses(lines: &[ExpenseLine], base: &ExpenseBase) -> ExpenseBreakdown {
    let lines: Vec<ResolvedExpense> = lines
        .iter()
        .map(|line| {
            let monthly_amount = resolve_expense(line, base);
            ResolvedExpense {
                name: line.name.clone(),
                monthly_amount,
                annual_amount: monthly_amount * dec!(12),
            }
        })
        .collect();

    let total_monthly = lines.iter().map(|l| l.monthly_amount).sum::<Decimal>();

    ExpenseBreakdown {
        lines,
        total_monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ExpenseBase {
        ExpenseBase {
            gross_rental_income: dec!(12000),
            total_gross_income: dec!(12500),
            purchase_price: dec!(1000000),
        }
    }

    #[test]
    fn test_flat_expense_used_as_is() {
        let line = ExpenseLine::flat("Insurance", dec!(450));
        assert_eq!(resolve_expense(&line, &base()), dec!(450));
    }

    #[test]
    fn test_rent_basis_uses_rental_income_only() {
        let line = ExpenseLine::percentage("Management", dec!(8), PercentageBasis::Rent);
        // 12000 * 8% = 960 (not 12500 * 8%)
        assert_eq!(resolve_expense(&line, &base()), dec!(960));
    }

    #[test]
    fn test_income_basis_uses_total_gross_income() {
        let line = ExpenseLine::percentage("Vacancy", dec!(5), PercentageBasis::Income);
        // 12500 * 5% = 625
        assert_eq!(resolve_expense(&line, &base()), dec!(625));
    }

    #[test]
    fn test_property_value_basis_is_monthly() {
        let line = ExpenseLine::percentage("Taxes", dec!(1.2), PercentageBasis::PropertyValue);
        // 1,000,000 * 1.2% / 12 = 1000
        assert_eq!(resolve_expense(&line, &base()), dec!(1000));
    }

    #[test]
    fn test_breakdown_totals() {
        let lines = vec![
            ExpenseLine::flat("Insurance", dec!(450)),
            ExpenseLine::percentage("Management", dec!(8), PercentageBasis::Rent),
            ExpenseLine::percentage("Taxes", dec!(1.2), PercentageBasis::PropertyValue),
        ];
        let breakdown = resolve_expenses(&lines, &base());
        assert_eq!(breakdown.lines.len(), 3);
        assert_eq!(breakdown.total_monthly, dec!(2410));
        assert_eq!(breakdown.lines[1].annual_amount, dec!(11520));
    }

    #[test]
    fn test_percentages_track_scenario_base() {
        let line = ExpenseLine::percentage("Management", dec!(8), PercentageBasis::Rent);
        let mut market = base();
        market.gross_rental_income = dec!(14000);
        assert_eq!(resolve_expense(&line, &market), dec!(1120));
    }
}
