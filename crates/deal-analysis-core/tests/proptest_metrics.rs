//! Property-based tests for the metrics pipeline.
//!
//! Invariants verified:
//! - Cash purchases carry no debt service and an unbounded DSCR
//! - Zero purchase price / investment / income give zero ratios, never a panic
//! - Market rents at or above current rents never shrink cash flow or income
//! - Repeated calls give identical results
//! - Mortgage payment is the same in both rent scenarios

use deal_analysis_core::property::analysis::compute_metrics;
use deal_analysis_core::property::inputs::{
    ExpenseLine, IncomeLine, PercentageBasis, PropertyInputs, UnitMixEntry,
};
use deal_analysis_core::Coverage;
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies
// ───────────────────────────────────────────────────────────────────

fn money(max: u32) -> impl Strategy<Value = Decimal> {
    (0u32..=max).prop_map(Decimal::from)
}

/// Whole percentages with one decimal place, [0.0, 30.0].
fn small_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=300).prop_map(|n| Decimal::new(n, 1))
}

fn basis() -> impl Strategy<Value = PercentageBasis> {
    prop_oneof![
        Just(PercentageBasis::Rent),
        Just(PercentageBasis::Income),
        Just(PercentageBasis::PropertyValue),
    ]
}

/// Units whose market rent is never below current rent.
fn unit() -> impl Strategy<Value = UnitMixEntry> {
    (1u32..=50, 0u32..=5_000, 0u32..=1_000).prop_map(|(count, rent, premium)| UnitMixEntry {
        unit_type: "unit".into(),
        unit_count: count,
        current_rent: Decimal::from(rent),
        market_rent: Decimal::from(rent + premium),
    })
}

fn property() -> impl Strategy<Value = PropertyInputs> {
    (100_000u32..=5_000_000, 0u32..=100, 0u32..=40, 0i64..=120, any::<bool>()).prop_map(
        |(price, down_pct, years, rate_tenths, cash)| {
            let price = Decimal::from(price);
            PropertyInputs {
                purchase_price: price,
                down_payment: price * Decimal::from(down_pct) / Decimal::ONE_HUNDRED,
                loan_term_years: years,
                interest_rate: Decimal::new(rate_tenths, 1),
                is_cash_purchase: cash,
            }
        },
    )
}

/// At most three percentage lines of up to 30% each, so percentages never
/// consume more than the income they scale with.
fn expenses() -> impl Strategy<Value = Vec<ExpenseLine>> {
    let pct = (small_percent(), basis())
        .prop_map(|(p, b)| ExpenseLine::percentage("pct", p, b));
    let flat = money(5_000).prop_map(|a| ExpenseLine::flat("flat", a));
    (prop::collection::vec(pct, 0..=3), prop::collection::vec(flat, 0..=3)).prop_map(
        |(mut pcts, flats)| {
            pcts.extend(flats);
            pcts
        },
    )
}

fn income() -> impl Strategy<Value = Vec<IncomeLine>> {
    prop::collection::vec(
        (money(2_000), any::<bool>()).prop_map(|(amount, calc)| IncomeLine {
            name: "other".into(),
            amount,
            is_calculated: calc,
        }),
        0..=3,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn cash_purchase_has_no_debt(
        mut prop in property(),
        mix in prop::collection::vec(unit(), 0..=4),
        inc in income(),
        exp in expenses(),
    ) {
        prop.is_cash_purchase = true;
        let m = compute_metrics(&prop, &mix, &inc, &exp).unwrap();
        prop_assert_eq!(m.current.monthly_breakdown.mortgage_payment, Decimal::ZERO);
        prop_assert_eq!(m.current.key_metrics.total_investment, prop.purchase_price);
        prop_assert_eq!(m.current.key_metrics.debt_service_coverage_ratio, Coverage::Unbounded);
        prop_assert_eq!(m.market.key_metrics.debt_service_coverage_ratio, Coverage::Unbounded);
    }

    #[test]
    fn zero_denominators_give_zero_ratios(
        mut prop in property(),
        exp in expenses(),
    ) {
        prop.purchase_price = Decimal::ZERO;
        prop.down_payment = Decimal::ZERO;
        let m = compute_metrics(&prop, &[], &[], &exp).unwrap();
        for r in [&m.current, &m.market] {
            prop_assert_eq!(r.key_metrics.cap_rate, Decimal::ZERO);
            prop_assert_eq!(r.key_metrics.cash_on_cash_return, Decimal::ZERO);
            prop_assert_eq!(r.key_metrics.gross_rent_multiplier, Decimal::ZERO);
        }
    }

    #[test]
    fn market_rents_never_reduce_upside(
        prop in property(),
        mix in prop::collection::vec(unit(), 1..=4),
        inc in income(),
        exp in expenses(),
    ) {
        let m = compute_metrics(&prop, &mix, &inc, &exp).unwrap();
        prop_assert!(m.upside.monthly_breakdown.gross_income >= Decimal::ZERO);
        prop_assert!(
            m.upside.key_metrics.annual_cash_flow >= Decimal::ZERO,
            "upside cash flow {}",
            m.upside.key_metrics.annual_cash_flow
        );
    }

    #[test]
    fn repeated_calls_are_identical(
        prop in property(),
        mix in prop::collection::vec(unit(), 0..=4),
        inc in income(),
        exp in expenses(),
    ) {
        let first = compute_metrics(&prop, &mix, &inc, &exp).unwrap();
        let second = compute_metrics(&prop, &mix, &inc, &exp).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn mortgage_is_scenario_independent(
        prop in property(),
        mix in prop::collection::vec(unit(), 0..=4),
        exp in expenses(),
    ) {
        let m = compute_metrics(&prop, &mix, &[], &exp).unwrap();
        prop_assert_eq!(
            m.current.monthly_breakdown.mortgage_payment,
            m.market.monthly_breakdown.mortgage_payment
        );
        prop_assert_eq!(m.upside.annual_breakdown.debt_service, Decimal::ZERO);
    }
}
