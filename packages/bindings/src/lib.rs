use napi::Result as NapiResult;
use napi_derive::napi;

use deal_analysis_core::deal::commission::{self, CommissionTerms};
use deal_analysis_core::property::analysis::{self, PropertyAnalysisInput};
use deal_analysis_core::property::defaults::AnalysisDefaults;
use deal_analysis_core::property::financing::{self, AmortizationInput};
use deal_analysis_core::property::inputs::PropertyInputs;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Property analysis
// ---------------------------------------------------------------------------

/// Current / market / upside metrics only, for views that render numbers
/// without the envelope.
#[napi]
pub fn compute_metrics(input_json: String) -> NapiResult<String> {
    let input: PropertyAnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::compute_metrics(&input.property, &input.unit_mix, &input.income, &input.expenses)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let input: PropertyAnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyze_property(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = financing::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Outstanding principal after `months_paid` payments, as a decimal string.
#[napi]
pub fn remaining_balance(property_json: String, months_paid: u32) -> NapiResult<String> {
    let property: PropertyInputs = serde_json::from_str(&property_json).map_err(to_napi_error)?;
    let balance = financing::remaining_balance(&property, months_paid).map_err(to_napi_error)?;
    Ok(balance.to_string())
}

/// Built-in form defaults, or the given JSON merged over them and validated.
#[napi]
pub fn analysis_defaults(overrides_json: Option<String>) -> NapiResult<String> {
    let defaults = match overrides_json {
        Some(json) => AnalysisDefaults::from_json(&json).map_err(to_napi_error)?,
        None => AnalysisDefaults::default(),
    };
    serde_json::to_string(&defaults).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deals
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_commission(terms_json: String, deal_value: String) -> NapiResult<String> {
    let terms: CommissionTerms = serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let deal_value: rust_decimal::Decimal = deal_value.parse().map_err(to_napi_error)?;
    let output = commission::resolve_commission(&terms, deal_value);
    serde_json::to_string(&output).map_err(to_napi_error)
}
