use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, info};

use deal_analysis_core::presentation::{format_coverage, rate_as_percent, round_currency};
use deal_analysis_core::property::analysis::{self, PropertyAnalysisInput};
use deal_analysis_core::property::defaults::AnalysisDefaults;
use deal_analysis_core::property::financing::{self, AmortizationInput};
use deal_analysis_core::property::inputs::PropertyInputs;
use deal_analysis_core::property::metrics::MetricsResult;

use crate::input;

/// Arguments for a property analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON/YAML analysis request (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Defaults file (JSON/YAML) used to fill in flag-based requests
    #[arg(long)]
    pub defaults: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment (defaults to the configured percentage of price)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// All-cash purchase
    #[arg(long)]
    pub cash: bool,

    /// Number of units (single unit-mix row)
    #[arg(long)]
    pub units: Option<u32>,

    /// Current monthly rent per unit
    #[arg(long)]
    pub current_rent: Option<Decimal>,

    /// Market monthly rent per unit (defaults to the configured premium)
    #[arg(long)]
    pub market_rent: Option<Decimal>,

    /// Print a rounded current / market / upside summary instead of the full result
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to JSON/YAML amortization request (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term: u32,

    /// First payment date (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment: Option<String>,

    /// Show yearly roll-ups only
    #[arg(long)]
    pub yearly: bool,

    /// Report only the outstanding balance after this many payments
    #[arg(long)]
    pub balance_after: Option<u32>,
}

/// Arguments for printing analysis defaults
#[derive(Args)]
pub struct DefaultsArgs {
    /// Defaults file (JSON/YAML) to validate and print instead of the built-ins
    #[arg(long)]
    pub defaults: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PropertyAnalysisInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let defaults = load_defaults(args.defaults.as_deref())?;
        request_from_flags(&args, &defaults)?
    };

    debug!(
        units = request.unit_mix.len(),
        expenses = request.expenses.len(),
        "running property analysis"
    );

    let result = analysis::analyze_property(&request)?;
    info!(
        warnings = result.warnings.len(),
        elapsed_us = result.metadata.computation_time_us,
        "analysis complete"
    );

    if args.summary {
        let s = &result.result.scenarios;
        return Ok(json!({
            "results": summary_rows(&s.current, &s.market, &s.upside),
            "warnings": result.warnings,
        }));
    }

    Ok(serde_json::to_value(result)?)
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let price = args.price.ok_or("--price is required (or provide --input)")?;
        let down_payment = args
            .down_payment
            .ok_or("--down-payment is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        serde_json::from_value(json!({
            "property": {
                "purchasePrice": price,
                "downPayment": down_payment,
                "loanTermYears": args.term,
                "interestRate": rate,
                "isCashPurchase": false,
            },
            "firstPaymentDate": args.first_payment,
        }))?
    };

    if let Some(months_paid) = args.balance_after {
        return balance_report(&request.property, months_paid);
    }

    let result = financing::amortization_schedule(&request)?;
    debug!(rows = result.result.rows.len(), "amortization schedule built");

    if args.yearly {
        return Ok(json!({
            "results": result.result.years,
            "warnings": result.warnings,
        }));
    }

    Ok(serde_json::to_value(result)?)
}

fn balance_report(
    property: &PropertyInputs,
    months_paid: u32,
) -> Result<Value, Box<dyn std::error::Error>> {
    let balance = financing::remaining_balance(property, months_paid)?;
    debug!(months_paid, %balance, "remaining balance computed");
    Ok(json!({
        "monthsPaid": months_paid,
        "remainingBalance": balance,
    }))
}

pub fn run_defaults(args: DefaultsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let defaults = load_defaults(args.defaults.as_deref())?;
    Ok(serde_json::to_value(defaults)?)
}

fn load_defaults(path: Option<&str>) -> Result<AnalysisDefaults, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let defaults: AnalysisDefaults = input::file::read_document(path)?;
            defaults.validate()?;
            debug!(path, "loaded analysis defaults");
            Ok(defaults)
        }
        None => Ok(AnalysisDefaults::default()),
    }
}

fn request_from_flags(
    args: &AnalyzeArgs,
    defaults: &AnalysisDefaults,
) -> Result<PropertyAnalysisInput, Box<dyn std::error::Error>> {
    let price = args.price.ok_or("--price is required (or provide --input)")?;
    let units = args.units.ok_or("--units is required (or provide --input)")?;
    let current_rent = args
        .current_rent
        .ok_or("--current-rent is required (or provide --input)")?;

    let mut property = defaults.seed_property(price);
    if let Some(down) = args.down_payment {
        property.down_payment = down;
    }
    if let Some(rate) = args.rate {
        property.interest_rate = rate;
    }
    if let Some(term) = args.term {
        property.loan_term_years = term;
    }
    property.is_cash_purchase = args.cash;

    let mut unit = defaults.seed_unit("Unit", units, current_rent);
    if let Some(market) = args.market_rent {
        unit.market_rent = market;
    }

    Ok(PropertyAnalysisInput {
        property,
        unit_mix: vec![unit],
        income: vec![],
        expenses: defaults.expenses.clone(),
    })
}

fn summary_rows(current: &MetricsResult, market: &MetricsResult, upside: &MetricsResult) -> Vec<Value> {
    let s = [current, market, upside];

    vec![
        row("Monthly gross income", s, |m| money(m.monthly_breakdown.gross_income)),
        row("Monthly expenses", s, |m| money(m.monthly_breakdown.total_expenses)),
        row("Monthly NOI", s, |m| money(m.monthly_breakdown.net_operating_income)),
        row("Monthly mortgage", s, |m| money(m.monthly_breakdown.mortgage_payment)),
        row("Monthly cash flow", s, |m| money(m.monthly_breakdown.cash_flow)),
        row("Annual NOI", s, |m| money(m.key_metrics.net_operating_income)),
        row("Annual cash flow", s, |m| money(m.key_metrics.annual_cash_flow)),
        row("Cap rate", s, |m| percent(m.key_metrics.cap_rate)),
        row("Cash-on-cash", s, |m| percent(m.key_metrics.cash_on_cash_return)),
        row("GRM", s, |m| m.key_metrics.gross_rent_multiplier.round_dp(2).to_string()),
        row("DSCR", s, |m| format_coverage(&m.key_metrics.debt_service_coverage_ratio)),
    ]
}

fn row(label: &str, scenarios: [&MetricsResult; 3], render: impl Fn(&MetricsResult) -> String) -> Value {
    let [current, market, upside] = scenarios;
    json!({
        "metric": label,
        "current": render(current),
        "market": render(market),
        "upside": render(upside),
    })
}

fn money(value: Decimal) -> String {
    round_currency(value).to_string()
}

fn percent(rate: Decimal) -> String {
    format!("{}%", rate_as_percent(rate))
}
