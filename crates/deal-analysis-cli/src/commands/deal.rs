use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::deal::commission::{self, CommissionTerms};

/// Arguments for resolving a deal commission
#[derive(Args)]
pub struct CommissionArgs {
    /// Deal value the percentage applies to
    #[arg(long)]
    pub deal_value: Decimal,

    /// Commission as a percentage of deal value (takes priority)
    #[arg(long)]
    pub percent: Option<Decimal>,

    /// Flat commission amount (used when no percentage is given)
    #[arg(long)]
    pub amount: Option<Decimal>,
}

pub fn run_commission(args: CommissionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = CommissionTerms {
        commission_percent: args.percent,
        commission_amount: args.amount,
    };
    let result = commission::resolve_commission(&terms, args.deal_value);
    Ok(serde_json::to_value(result)?)
}
