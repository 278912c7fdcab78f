//! Capital loan calculator endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use wonderpay_core::capital::{self, LoanCalculationRequest, LoanCalculationResult};

use super::AppState;
use crate::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/capital/calculate", post(calculate_handler))
}

/// POST /api/capital/calculate
///
/// Returns the bare calculation result; callers read `monthly_payment` and the
/// schedule directly. Terms longer than `max_term_months` are refused with a
/// 400 before any schedule is built.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoanCalculationRequest>, JsonRejection>,
) -> Result<Json<LoanCalculationResult>, ApiError> {
    let Json(request) = payload?;
    let terms = request.to_terms()?;

    let max_term = state.config.max_term_months;
    if terms.term_months > max_term {
        return Err(ApiError::BadRequest(format!(
            "Invalid input: term_months exceeds the {max_term} month limit"
        )));
    }

    let result = capital::calculate(terms.loan_amount, terms.term_months, terms.interest_rate)?;

    tracing::debug!(
        loan_amount = %terms.loan_amount,
        term_months = terms.term_months,
        interest_rate = %result.interest_rate,
        rate_source = ?terms.rate_source,
        monthly_payment = %result.monthly_payment,
        "Calculated loan schedule"
    );

    Ok(Json(result))
}
