use deal_analysis_core::property::analysis::{analyze_property, compute_metrics, PropertyAnalysisInput};
use deal_analysis_core::property::defaults::AnalysisDefaults;
use deal_analysis_core::property::financing::{amortization_schedule, AmortizationInput};
use deal_analysis_core::property::inputs::{
    ExpenseLine, IncomeLine, PercentageBasis, PropertyInputs, UnitMixEntry,
};
use deal_analysis_core::Coverage;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// $1M, 20% down, 30 years at 6.5%; ten units at $1,200 / $1,400;
/// management at 8% of rent.
fn ten_unit_deal() -> PropertyAnalysisInput {
    PropertyAnalysisInput {
        property: PropertyInputs {
            purchase_price: dec!(1_000_000),
            down_payment: dec!(200_000),
            loan_term_years: 30,
            interest_rate: dec!(6.5),
            is_cash_purchase: false,
        },
        unit_mix: vec![UnitMixEntry {
            unit_type: "2BR/1BA".into(),
            unit_count: 10,
            current_rent: dec!(1200),
            market_rent: dec!(1400),
        }],
        income: vec![],
        expenses: vec![ExpenseLine::percentage(
            "Property Management",
            dec!(8),
            PercentageBasis::Rent,
        )],
    }
}

// ===========================================================================
// End-to-end scenario
// ===========================================================================

#[test]
fn test_ten_unit_current_scenario() {
    let input = ten_unit_deal();
    let m = compute_metrics(&input.property, &input.unit_mix, &input.income, &input.expenses)
        .unwrap();
    let current = &m.current;

    assert_eq!(current.monthly_breakdown.gross_income, dec!(12000));
    assert_eq!(current.monthly_breakdown.total_expenses, dec!(960));
    assert_eq!(current.monthly_breakdown.net_operating_income, dec!(11040));

    // $800k financed: P = 5,056.54
    assert_close(current.monthly_breakdown.mortgage_payment, dec!(5056.54), dec!(0.01));
    assert_close(current.monthly_breakdown.cash_flow, dec!(5983.46), dec!(0.01));

    assert_eq!(current.key_metrics.net_operating_income, dec!(132480));
    assert_eq!(current.key_metrics.cap_rate, dec!(0.13248));

    // 71,801.47 / 200,000
    assert_close(current.key_metrics.annual_cash_flow, dec!(71801.47), dec!(0.01));
    assert_close(current.key_metrics.cash_on_cash_return, dec!(0.3590), dec!(0.0001));
    assert_eq!(current.key_metrics.total_investment, dec!(200000));
}

#[test]
fn test_ten_unit_market_scenario_and_upside() {
    let input = ten_unit_deal();
    let m = compute_metrics(&input.property, &input.unit_mix, &input.income, &input.expenses)
        .unwrap();

    assert_eq!(m.market.monthly_breakdown.gross_income, dec!(14000));
    assert_eq!(m.market.monthly_breakdown.total_expenses, dec!(1120));
    assert_eq!(m.market.monthly_breakdown.net_operating_income, dec!(12880));
    assert_close(m.market.monthly_breakdown.cash_flow, dec!(7823.46), dec!(0.01));

    assert_close(m.upside.key_metrics.annual_cash_flow, dec!(22080), dec!(0.000001));
    assert_eq!(m.upside.annual_breakdown.net_operating_income, dec!(22080));
    assert_eq!(m.upside.monthly_breakdown.gross_income, dec!(2000));
    assert_eq!(m.upside.monthly_breakdown.mortgage_payment, Decimal::ZERO);
    assert_eq!(m.upside.key_metrics.cap_rate, dec!(0.02208));
}

#[test]
fn test_low_leverage_payment_and_cash_flow() {
    // $200k financed instead: P = 1,264.14
    let mut input = ten_unit_deal();
    input.property.down_payment = dec!(800_000);
    let m = compute_metrics(&input.property, &input.unit_mix, &input.income, &input.expenses)
        .unwrap();

    assert_close(m.current.monthly_breakdown.mortgage_payment, dec!(1264.14), dec!(0.01));
    assert_close(m.current.monthly_breakdown.cash_flow, dec!(9775.86), dec!(0.01));
    assert_close(m.current.key_metrics.annual_cash_flow, dec!(117310.37), dec!(0.01));
    assert_close(m.market.monthly_breakdown.cash_flow, dec!(11615.86), dec!(0.01));
}

#[test]
fn test_other_income_and_calculated_rollup() {
    let mut input = ten_unit_deal();
    input.income = vec![
        IncomeLine {
            name: "Rental Income".into(),
            amount: dec!(12000),
            is_calculated: true,
        },
        IncomeLine {
            name: "Laundry".into(),
            amount: dec!(300),
            is_calculated: false,
        },
    ];
    input.expenses.push(ExpenseLine::percentage("Vacancy", dec!(5), PercentageBasis::Income));

    let out = analyze_property(&input).unwrap();
    let current = &out.result.scenarios.current;

    // Rent 12,000 + laundry 300; rollup line ignored
    assert_eq!(current.monthly_breakdown.gross_income, dec!(12300));
    // Management 8% of 12,000 = 960; vacancy 5% of 12,300 = 615
    assert_eq!(current.monthly_breakdown.total_expenses, dec!(1575));
    assert_eq!(out.result.current_detail.income.other_income, dec!(300));
}

#[test]
fn test_cash_purchase_end_to_end() {
    let mut input = ten_unit_deal();
    input.property.is_cash_purchase = true;
    let m = compute_metrics(&input.property, &input.unit_mix, &input.income, &input.expenses)
        .unwrap();

    assert_eq!(m.current.monthly_breakdown.mortgage_payment, Decimal::ZERO);
    assert_eq!(m.current.key_metrics.total_investment, dec!(1000000));
    assert_eq!(m.current.key_metrics.debt_service_coverage_ratio, Coverage::Unbounded);
    assert_eq!(m.market.key_metrics.debt_service_coverage_ratio, Coverage::Unbounded);
    // 132,480 / 1,000,000
    assert_eq!(m.current.key_metrics.cash_on_cash_return, dec!(0.13248));
}

#[test]
fn test_defaults_seed_a_runnable_analysis() {
    let defaults = AnalysisDefaults::default();
    let input = PropertyAnalysisInput {
        property: defaults.seed_property(dec!(2_400_000)),
        unit_mix: vec![
            defaults.seed_unit("1BR", 12, dec!(1150)),
            defaults.seed_unit("2BR", 8, dec!(1450)),
        ],
        income: vec![],
        expenses: defaults.expenses.clone(),
    };

    let out = analyze_property(&input).unwrap();
    assert_eq!(out.result.profile.total_units, 20);
    assert_eq!(out.result.current_detail.expenses.lines.len(), 6);
    assert!(out.result.scenarios.upside.monthly_breakdown.gross_income > Decimal::ZERO);
}

#[test]
fn test_request_document_round_trip_through_json() {
    let json = r#"{
        "property": {
            "purchasePrice": "1000000",
            "downPayment": "200000",
            "loanTermYears": 30,
            "interestRate": "6.5",
            "isCashPurchase": false
        },
        "unitMix": [
            {"unitType": "2BR/1BA", "unitCount": 10, "currentRent": "1200", "marketRent": "1400"}
        ],
        "expenses": [
            {"name": "Property Management", "amount": "8", "isPercentage": true, "percentageBasis": "rent"}
        ]
    }"#;
    let input: PropertyAnalysisInput = serde_json::from_str(json).unwrap();
    let from_json = compute_metrics(&input.property, &input.unit_mix, &input.income, &input.expenses)
        .unwrap();

    let direct = ten_unit_deal();
    let expected = compute_metrics(&direct.property, &direct.unit_mix, &direct.income, &direct.expenses)
        .unwrap();
    assert_eq!(from_json, expected);
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_schedule_payment_matches_analysis() {
    let input = ten_unit_deal();
    let analysis = analyze_property(&input).unwrap();
    let schedule = amortization_schedule(&AmortizationInput {
        property: input.property.clone(),
        first_payment_date: None,
    })
    .unwrap();

    assert_eq!(schedule.result.monthly_payment, analysis.result.financing.monthly_payment);
    assert_eq!(schedule.result.rows.len(), 360);
    assert_eq!(schedule.result.rows.last().unwrap().balance, Decimal::ZERO);
}
