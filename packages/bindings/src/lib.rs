use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: home_finance_core::amortization::schedule::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = home_finance_core::amortization::schedule::compute_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_affordability(input_json: String) -> NapiResult<String> {
    let input: home_finance_core::affordability::estimator::AffordabilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = home_finance_core::affordability::estimator::estimate_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
