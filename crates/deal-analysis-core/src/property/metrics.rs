use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Coverage, Money, Multiple, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline investment metrics. Ratios are decimal fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Annual NOI / purchase price
    pub cap_rate: Rate,
    /// Annual cash flow / total investment
    pub cash_on_cash_return: Rate,
    /// Annual NOI
    pub net_operating_income: Money,
    /// Purchase price / annual gross income
    pub gross_rent_multiplier: Multiple,
    /// Monthly NOI / monthly debt service
    pub debt_service_coverage_ratio: Coverage,
    pub total_investment: Money,
    pub annual_cash_flow: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    pub gross_income: Money,
    pub total_expenses: Money,
    pub net_operating_income: Money,
    pub mortgage_payment: Money,
    pub cash_flow: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualBreakdown {
    pub gross_income: Money,
    pub total_expenses: Money,
    pub net_operating_income: Money,
    pub debt_service: Money,
    pub cash_flow: Money,
}

/// Full metric set for one rent scenario (or the delta between two).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub key_metrics: KeyMetrics,
    pub monthly_breakdown: MonthlyBreakdown,
    pub annual_breakdown: AnnualBreakdown,
}

/// Monthly figures and deal terms that feed the composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFigures {
    pub monthly_gross_income: Money,
    pub monthly_expenses: Money,
    pub monthly_debt_service: Money,
    pub purchase_price: Money,
    pub total_investment: Money,
    pub is_cash_purchase: bool,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Combine income, expenses and debt service into the metric set.
///
/// Every ratio is guarded: a zero denominator yields zero, except DSCR which
/// is unbounded for cash purchases and zero debt service.
pub fn compose_metrics(figures: &ScenarioFigures) -> MetricsResult {
    let monthly_noi = figures.monthly_gross_income - figures.monthly_expenses;
    let monthly_cash_flow = monthly_noi - figures.monthly_debt_service;

    let annual_gross_income = figures.monthly_gross_income * dec!(12);
    let annual_expenses = figures.monthly_expenses * dec!(12);
    let annual_noi = monthly_noi * dec!(12);
    let annual_debt_service = figures.monthly_debt_service * dec!(12);
    let annual_cash_flow = monthly_cash_flow * dec!(12);

    let debt_service_coverage_ratio = if figures.is_cash_purchase {
        Coverage::Unbounded
    } else {
        Coverage::ratio(monthly_noi, figures.monthly_debt_service)
    };

    MetricsResult {
        key_metrics: KeyMetrics {
            cap_rate: safe_div(annual_noi, figures.purchase_price),
            cash_on_cash_return: safe_div(annual_cash_flow, figures.total_investment),
            net_operating_income: annual_noi,
            gross_rent_multiplier: safe_div(figures.purchase_price, annual_gross_income),
            debt_service_coverage_ratio,
            total_investment: figures.total_investment,
            annual_cash_flow,
        },
        monthly_breakdown: MonthlyBreakdown {
            gross_income: figures.monthly_gross_income,
            total_expenses: figures.monthly_expenses,
            net_operating_income: monthly_noi,
            mortgage_payment: figures.monthly_debt_service,
            cash_flow: monthly_cash_flow,
        },
        annual_breakdown: AnnualBreakdown {
            gross_income: annual_gross_income,
            total_expenses: annual_expenses,
            net_operating_income: annual_noi,
            debt_service: annual_debt_service,
            cash_flow: annual_cash_flow,
        },
    }
}

impl MetricsResult {
    /// Element-wise `market - current` across every metric.
    pub fn upside(market: &MetricsResult, current: &MetricsResult) -> MetricsResult {
        let (mk, ck) = (&market.key_metrics, &current.key_metrics);
        let (mm, cm) = (&market.monthly_breakdown, &current.monthly_breakdown);
        let (ma, ca) = (&market.annual_breakdown, &current.annual_breakdown);

        MetricsResult {
            key_metrics: KeyMetrics {
                cap_rate: mk.cap_rate - ck.cap_rate,
                cash_on_cash_return: mk.cash_on_cash_return - ck.cash_on_cash_return,
                net_operating_income: mk.net_operating_income - ck.net_operating_income,
                gross_rent_multiplier: mk.gross_rent_multiplier - ck.gross_rent_multiplier,
                debt_service_coverage_ratio: mk
                    .debt_service_coverage_ratio
                    .delta(&ck.debt_service_coverage_ratio),
                total_investment: mk.total_investment - ck.total_investment,
                annual_cash_flow: mk.annual_cash_flow - ck.annual_cash_flow,
            },
            monthly_breakdown: MonthlyBreakdown {
                gross_income: mm.gross_income - cm.gross_income,
                total_expenses: mm.total_expenses - cm.total_expenses,
                net_operating_income: mm.net_operating_income - cm.net_operating_income,
                mortgage_payment: mm.mortgage_payment - cm.mortgage_payment,
                cash_flow: mm.cash_flow - cm.cash_flow,
            },
            annual_breakdown: AnnualBreakdown {
                gross_income: ma.gross_income - ca.gross_income,
                total_expenses: ma.total_expenses - ca.total_expenses,
                net_operating_income: ma.net_operating_income - ca.net_operating_income,
                debt_service: ma.debt_service - ca.debt_service,
                cash_flow: ma.cash_flow - ca.cash_flow,
            },
        }
    }
}

fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
