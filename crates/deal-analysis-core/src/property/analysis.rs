use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::expenses::{resolve_expenses, ExpenseBase, ExpenseBreakdown};
use super::financing::monthly_payment;
use super::income::{summarize_income, IncomeSummary, RentScenario};
use super::inputs::{normalize, ExpenseLine, IncomeLine, PropertyInputs, UnitMixEntry};
use super::metrics::{compose_metrics, MetricsResult, ScenarioFigures};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::AnalysisResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the analysis form collects for one property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAnalysisInput {
    pub property: PropertyInputs,
    pub unit_mix: Vec<UnitMixEntry>,
    #[serde(default)]
    pub income: Vec<IncomeLine>,
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
}

/// Current-rent metrics, market-rent metrics, and the gap between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub current: MetricsResult,
    pub market: MetricsResult,
    pub upside: MetricsResult,
}

/// Income and resolved expenses behind one scenario's metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDetail {
    pub income: IncomeSummary,
    pub expenses: ExpenseBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingSummary {
    pub is_cash_purchase: bool,
    pub down_payment: Money,
    pub loan_amount: Money,
    /// Loan amount / purchase price
    pub loan_to_value: Rate,
    pub interest_rate: Percent,
    pub loan_term_years: u32,
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyProfile {
    pub total_units: u64,
    pub price_per_unit: Money,
    pub average_current_rent: Money,
    pub average_market_rent: Money,
    /// Market rent over current rent, minus one
    pub market_rent_premium: Rate,
    /// Total expenses / gross income, current rents
    pub operating_expense_ratio: Rate,
}

/// Complete property analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAnalysis {
    #[serde(flatten)]
    pub scenarios: ScenarioComparison,
    pub current_detail: ScenarioDetail,
    pub market_detail: ScenarioDetail,
    pub financing: FinancingSummary,
    pub profile: PropertyProfile,
}

struct ScenarioRun {
    comparison: ScenarioComparison,
    current_detail: ScenarioDetail,
    market_detail: ScenarioDetail,
    property: PropertyInputs,
    payment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Current and market metrics plus upside for a property.
///
/// Pure: identical inputs always give identical outputs. The only error is
/// arithmetic overflow in the debt-service calculation.
pub fn compute_metrics(
    property: &PropertyInputs,
    unit_mix: &[UnitMixEntry],
    income: &[IncomeLine],
    expenses: &[ExpenseLine],
) -> AnalysisResult<ScenarioComparison> {
    run_scenarios(property, unit_mix, income, expenses).map(|run| run.comparison)
}

/// Run the full analysis and wrap it with supporting detail, warnings and
/// computation metadata.
pub fn analyze_property(
    input: &PropertyAnalysisInput,
) -> AnalysisResult<ComputationOutput<PropertyAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    collect_input_warnings(input, &mut warnings);

    let run = run_scenarios(&input.property, &input.unit_mix, &input.income, &input.expenses)?;

    let financing = summarize_financing(&run.property, run.payment);
    let profile = profile_property(&run.property, &input.unit_mix, &run.current_detail);

    collect_result_warnings(&run.comparison, &financing, &mut warnings);

    let output = PropertyAnalysis {
        scenarios: run.comparison,
        current_detail: run.current_detail,
        market_detail: run.market_detail,
        financing,
        profile,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Multifamily Income Analysis (current vs. market rent)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

fn run_scenarios(
    property: &PropertyInputs,
    unit_mix: &[UnitMixEntry],
    income: &[IncomeLine],
    expenses: &[ExpenseLine],
) -> AnalysisResult<ScenarioRun> {
    let property = normalize(property);
    let payment = monthly_payment(&property)?;

    let (current, current_detail) =
        run_scenario(&property, unit_mix, income, expenses, payment, RentScenario::Current);
    let (market, market_detail) =
        run_scenario(&property, unit_mix, income, expenses, payment, RentScenario::Market);
    let upside = MetricsResult::upside(&market, &current);

    Ok(ScenarioRun {
        comparison: ScenarioComparison {
            current,
            market,
            upside,
        },
        current_detail,
        market_detail,
        property,
        payment,
    })
}

fn run_scenario(
    property: &PropertyInputs,
    unit_mix: &[UnitMixEntry],
    income: &[IncomeLine],
    expenses: &[ExpenseLine],
    payment: Money,
    scenario: RentScenario,
) -> (MetricsResult, ScenarioDetail) {
    let income = summarize_income(unit_mix, income, scenario);
    let base = ExpenseBase::new(&income, property.purchase_price);
    let expenses = resolve_expenses(expenses, &base);

    let metrics = compose_metrics(&ScenarioFigures {
        monthly_gross_income: income.total_gross_income,
        monthly_expenses: expenses.total_monthly,
        monthly_debt_service: payment,
        purchase_price: property.purchase_price,
        total_investment: property.total_investment(),
        is_cash_purchase: property.is_cash_purchase,
    });

    (metrics, ScenarioDetail { income, expenses })
}

fn summarize_financing(property: &PropertyInputs, payment: Money) -> FinancingSummary {
    let loan_amount = property.loan_amount();
    FinancingSummary {
        is_cash_purchase: property.is_cash_purchase,
        down_payment: property.down_payment,
        loan_amount,
        loan_to_value: ratio(loan_amount, property.purchase_price),
        interest_rate: property.interest_rate,
        loan_term_years: property.loan_term_years,
        monthly_payment: payment,
        annual_debt_service: payment * dec!(12),
    }
}

fn profile_property(
    property: &PropertyInputs,
    unit_mix: &[UnitMixEntry],
    current: &ScenarioDetail,
) -> PropertyProfile {
    let total_units: u64 = unit_mix.iter().map(|u| u64::from(u.unit_count)).sum();
    let units = Decimal::from(total_units);

    let current_rent: Money = unit_mix
        .iter()
        .map(|u| u.current_rent * Decimal::from(u.unit_count))
        .sum();
    let market_rent: Money = unit_mix
        .iter()
        .map(|u| u.market_rent * Decimal::from(u.unit_count))
        .sum();

    let market_rent_premium = if current_rent.is_zero() {
        Decimal::ZERO
    } else {
        market_rent / current_rent - Decimal::ONE
    };

    PropertyProfile {
        total_units,
        price_per_unit: ratio(property.purchase_price, units),
        average_current_rent: ratio(current_rent, units),
        average_market_rent: ratio(market_rent, units),
        market_rent_premium,
        operating_expense_ratio: ratio(
            current.expenses.total_monthly,
            current.income.total_gross_income,
        ),
    }
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_input_warnings(input: &PropertyAnalysisInput, warnings: &mut Vec<String>) {
    let property = &input.property;

    if !property.is_cash_purchase && property.down_payment > property.purchase_price {
        warnings.push(format!(
            "Down payment {} exceeds purchase price {} — loan amount is negative",
            property.down_payment, property.purchase_price
        ));
    }

    if input.unit_mix.is_empty() {
        warnings.push("Unit mix is empty — rental income is zero".into());
    }

    for unit in input.unit_mix.iter().filter(|u| u.unit_count == 0) {
        warnings.push(format!(
            "Unit type '{}' has zero units and contributes no rent",
            unit.unit_type
        ));
    }

    for line in input.expenses.iter().filter(|l| l.is_percentage) {
        if line.amount < Decimal::ZERO || line.amount > dec!(100) {
            warnings.push(format!(
                "Expense '{}' percentage {} is outside 0–100",
                line.name, line.amount
            ));
        }
    }
}

fn collect_result_warnings(
    comparison: &ScenarioComparison,
    financing: &FinancingSummary,
    warnings: &mut Vec<String>,
) {
    if let Some(dscr) = comparison.current.key_metrics.debt_service_coverage_ratio.finite() {
        if dscr < dec!(1.2) {
            warnings.push(format!(
                "DSCR of {dscr:.2} at current rents is below 1.20x — lender covenant risk"
            ));
        }
    }

    if !financing.is_cash_purchase
        && financing.loan_amount > Decimal::ZERO
        && financing.monthly_payment.is_zero()
    {
        warnings.push(format!(
            "Loan of {} has no scheduled debt service (zero rate or term) — DSCR is unbounded",
            financing.loan_amount
        ));
    }

    if comparison.current.key_metrics.annual_cash_flow < Decimal::ZERO {
        warnings.push("Negative cash flow at current rents".into());
    }

    if financing.loan_to_value > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80% — high leverage",
            financing.loan_to_value * dec!(100)
        ));
    }
}
