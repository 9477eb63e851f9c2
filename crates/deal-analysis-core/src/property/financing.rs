use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::inputs::{normalize, PropertyInputs};
use crate::error::DealAnalysisError;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Rate};
use crate::AnalysisResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Request for a month-by-month amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationInput {
    pub property: PropertyInputs,
    /// Date of the first payment; rows carry no dates when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Twelve-month roll-up of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationYear {
    pub year: u32,
    pub total_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_months: u32,
    pub rows: Vec<AmortizationRow>,
    pub years: Vec<AmortizationYear>,
    pub total_interest: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Debt service
// ---------------------------------------------------------------------------

/// Monthly rate from a whole-percentage nominal annual rate.
pub fn monthly_rate(annual_percent: Decimal) -> Rate {
    percent_to_rate(annual_percent) / dec!(12)
}

/// Fixed-rate, fully amortizing monthly payment.
///
/// Zero when there is no loan, no interest rate, or no term. A negative loan
/// amount (down payment above price) is not rejected and yields a negative
/// payment.
pub fn monthly_payment(inputs: &PropertyInputs) -> AnalysisResult<Money> {
    let inputs = normalize(inputs);
    let loan_amount = inputs.loan_amount();
    let rate = monthly_rate(inputs.interest_rate);
    let total_months = term_months(inputs.loan_term_years)?;

    level_payment(loan_amount, rate, total_months)
}

/// Loan term in monthly periods.
pub fn term_months(years: u32) -> AnalysisResult<u32> {
    years
        .checked_mul(12)
        .ok_or_else(|| overflow("loan term in months"))
}

/// `P * r(1+r)^n / ((1+r)^n - 1)` with the zero rules applied.
pub fn level_payment(principal: Money, monthly_rate: Rate, total_months: u32) -> AnalysisResult<Money> {
    if principal.is_zero() || monthly_rate.is_zero() || total_months == 0 {
        return Ok(Decimal::ZERO);
    }

    // (1 + r)^n via iterative multiplication
    let growth = Decimal::ONE + monthly_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..total_months {
        compound = compound
            .checked_mul(growth)
            .ok_or_else(|| overflow("compounding factor (1 + r)^n"))?;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(compound))
        .ok_or_else(|| overflow("mortgage payment numerator"))?;

    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow("mortgage payment"))
}

/// Outstanding principal after `months_paid` scheduled payments.
///
/// Zero when nothing is borrowed (cash purchase or a down payment at or
/// above price). A loan with no scheduled debt service never amortizes.
pub fn remaining_balance(inputs: &PropertyInputs, months_paid: u32) -> AnalysisResult<Money> {
    let inputs = normalize(inputs);
    let loan_amount = inputs.loan_amount();
    if loan_amount <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let rate = monthly_rate(inputs.interest_rate);
    let total_months = term_months(inputs.loan_term_years)?;
    let payment = level_payment(loan_amount, rate, total_months)?;

    if payment.is_zero() {
        return Ok(loan_amount);
    }
    if months_paid >= total_months {
        return Ok(Decimal::ZERO);
    }

    let mut balance = loan_amount;
    for _ in 0..months_paid {
        let interest = balance * rate;
        balance -= payment - interest;
    }

    Ok(balance.max(Decimal::ZERO))
}

// ---------------------------------------------------------------------------
// Amortization schedule
// ---------------------------------------------------------------------------

/// Build the month-by-month amortization schedule for the financed portion
/// of a purchase.
///
/// Cash purchases, zero-rate loans, and non-positive loan amounts produce an
/// empty schedule with a warning. The final payment absorbs residual
/// rounding so the balance closes at exactly zero.
pub fn amortization_schedule(
    input: &AmortizationInput,
) -> AnalysisResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let property = normalize(&input.property);
    let loan_amount = property.loan_amount();
    let rate = monthly_rate(property.interest_rate);
    let total_months = term_months(property.loan_term_years)?;
    let payment = level_payment(loan_amount, rate, total_months)?;

    let mut schedule = AmortizationSchedule {
        loan_amount,
        monthly_payment: payment,
        total_months,
        rows: Vec::new(),
        years: Vec::new(),
        total_interest: Decimal::ZERO,
        total_paid: Decimal::ZERO,
    };

    if property.is_cash_purchase {
        warnings.push("Cash purchase — no loan to amortize".into());
    } else if loan_amount <= Decimal::ZERO {
        warnings.push(format!(
            "Loan amount {loan_amount} is not positive — down payment covers the price"
        ));
    } else if payment.is_zero() {
        warnings.push("Zero interest rate or loan term — no scheduled debt service".into());
    } else {
        schedule.rows = build_rows(loan_amount, rate, payment, total_months, input.first_payment_date);
        schedule.years = roll_up_years(&schedule.rows);
        schedule.total_interest = schedule.rows.iter().map(|r| r.interest).sum();
        schedule.total_paid = schedule.rows.iter().map(|r| r.payment).sum();
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fixed-rate fully amortizing loan schedule",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}

fn build_rows(
    loan_amount: Money,
    rate: Rate,
    payment: Money,
    total_months: u32,
    first_payment_date: Option<NaiveDate>,
) -> Vec<AmortizationRow> {
    let mut rows = Vec::with_capacity(total_months.min(600) as usize);
    let mut balance = loan_amount;

    for period in 1..=total_months {
        let interest = balance * rate;
        let (principal, this_payment) = if period == total_months || payment - interest >= balance {
            (balance, balance + interest)
        } else {
            (payment - interest, payment)
        };
        balance -= principal;

        let payment_date =
            first_payment_date.and_then(|d| d.checked_add_months(Months::new(period - 1)));

        rows.push(AmortizationRow {
            period,
            payment_date,
            payment: this_payment,
            interest,
            principal,
            balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    rows
}

fn roll_up_years(rows: &[AmortizationRow]) -> Vec<AmortizationYear> {
    rows.chunks(12)
        .enumerate()
        .map(|(i, chunk)| AmortizationYear {
            year: i as u32 + 1,
            total_payment: chunk.iter().map(|r| r.payment).sum(),
            total_interest: chunk.iter().map(|r| r.interest).sum(),
            total_principal: chunk.iter().map(|r| r.principal).sum(),
            ending_balance: chunk.last().map(|r| r.balance).unwrap_or_default(),
        })
        .collect()
}

fn overflow(context: &str) -> DealAnalysisError {
    DealAnalysisError::ArithmeticOverflow {
        context: context.into(),
    }
}
