use napi::Result as NapiResult;
use napi_derive::napi;

use wonderpay_core::capital::{self, LoanCalculationRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_request(input_json: &str) -> NapiResult<LoanCalculationRequest> {
    LoanCalculationRequest::from_json(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Capital
// ---------------------------------------------------------------------------

/// Same JSON contract as `POST /api/capital/calculate`: returns the bare
/// `LoanCalculationResult`.
#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let output = capital::calculate_from_request(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Calculation wrapped in the computation envelope (methodology,
/// assumptions, warnings, metadata).
#[napi]
pub fn model_loan(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let output = capital::model_loan(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Annual rate applied when a request omits `interest_rate`.
#[napi]
pub fn base_annual_rate() -> String {
    capital::BASE_ANNUAL_RATE.to_string()
}
