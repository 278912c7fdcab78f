//! Fixed-payment loan amortization.
//!
//! The running balance is carried at full decimal precision from period to
//! period; only the values reported on each schedule entry are rounded to
//! cents. Rounding the balance in-loop produces a visibly different schedule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::request::{LoanCalculationRequest, RateSource};
use crate::error::WonderPayError;
use crate::time_value;
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Months, Rate};
use crate::WonderPayResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Annual nominal rate applied when the caller does not supply one.
pub const BASE_ANNUAL_RATE: Rate = dec!(0.065);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Output Types
// ---------------------------------------------------------------------------

/// One month of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationScheduleEntry {
    /// 1-based.
    pub payment_number: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_amount: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal_amount: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_amount: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_balance: Money,
}

/// Result of a loan calculation. Serialises with JSON numbers, which is the
/// shape the dashboard's capital page reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCalculationResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_repayment: Money,
    /// Resolved annual rate, unrounded.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Rate,
    pub amortization_schedule: Vec<AmortizationScheduleEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the level monthly payment, totals and full amortization schedule.
///
/// `interest_rate` is an annual nominal rate as a decimal; `None` applies
/// [`BASE_ANNUAL_RATE`]. A zero rate repays the principal in equal slices.
/// Negative rates are accepted while the monthly rate stays above -100%.
pub fn calculate(
    loan_amount: Money,
    term_months: Months,
    interest_rate: Option<Rate>,
) -> WonderPayResult<LoanCalculationResult> {
    validate(loan_amount, term_months, interest_rate)?;

    let annual_rate = interest_rate.unwrap_or(BASE_ANNUAL_RATE);
    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let monthly_payment = time_value::pmt(monthly_rate, term_months, loan_amount)?;

    let total_repayment = monthly_payment
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| WonderPayError::ArithmeticOverflow {
            context: "total repayment".into(),
        })?;
    let total_interest = total_repayment - loan_amount;

    let amortization_schedule =
        build_schedule(loan_amount, term_months, monthly_rate, monthly_payment);

    Ok(LoanCalculationResult {
        monthly_payment: round_currency(monthly_payment),
        total_interest: round_currency(total_interest),
        total_repayment: round_currency(total_repayment),
        interest_rate: annual_rate,
        amortization_schedule,
    })
}

/// Validate a wire request and run [`calculate`] on it.
pub fn calculate_from_request(
    request: &LoanCalculationRequest,
) -> WonderPayResult<LoanCalculationResult> {
    let terms = request.to_terms()?;
    calculate(terms.loan_amount, terms.term_months, terms.interest_rate)
}

/// Run a calculation and wrap it in the standard computation envelope, with
/// warnings for inputs that are valid but probably not what the caller meant.
pub fn model_loan(
    request: &LoanCalculationRequest,
) -> WonderPayResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = request.to_terms()?;

    match terms.rate_source {
        RateSource::Supplied => {}
        RateSource::Default => warnings.push(format!(
            "No interest rate supplied; applied base rate of {BASE_ANNUAL_RATE}"
        )),
        RateSource::Unparseable => warnings.push(format!(
            "Interest rate could not be parsed as a number; applied base rate of {BASE_ANNUAL_RATE}"
        )),
    }
    if let Some(rate) = terms.interest_rate {
        if rate < Decimal::ZERO {
            warnings.push(format!(
                "Negative interest rate {rate}; total repayment is less than the loan amount"
            ));
        }
        if rate > Decimal::ONE {
            warnings.push(format!(
                "Interest rate {rate} exceeds 100%; rates are decimals (0.065 = 6.5%)"
            ));
        }
        if rate.is_zero() {
            warnings.push("Zero interest rate; principal repaid in equal monthly amounts".into());
        }
    }

    let result = calculate(terms.loan_amount, terms.term_months, terms.interest_rate)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity amortization, monthly compounding of a nominal annual rate",
        &serde_json::json!({
            "loan_amount": terms.loan_amount.to_string(),
            "term_months": terms.term_months,
            "interest_rate": result.interest_rate.to_string(),
            "rate_source": terms.rate_source,
            "monthly_rate": (result.interest_rate / MONTHS_PER_YEAR).to_string(),
            "rounding": "per-entry, half away from zero, 2dp",
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(
    loan_amount: Money,
    term_months: Months,
    interest_rate: Option<Rate>,
) -> WonderPayResult<()> {
    if loan_amount <= Decimal::ZERO {
        return Err(WonderPayError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if term_months == 0 {
        return Err(WonderPayError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if let Some(rate) = interest_rate {
        // (1 + r) must stay positive for the monthly rate r
        if rate / MONTHS_PER_YEAR <= -Decimal::ONE {
            return Err(WonderPayError::InvalidInput {
                field: "interest_rate".into(),
                reason: format!("Monthly rate must be above -100%, got {rate} per year"),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn build_schedule(
    loan_amount: Money,
    term_months: Months,
    monthly_rate: Rate,
    monthly_payment: Money,
) -> Vec<AmortizationScheduleEntry> {
    let mut schedule = Vec::with_capacity(term_months as usize);
    let mut balance = loan_amount;

    for payment_number in 1..=term_months {
        let interest = balance * monthly_rate;
        let principal = monthly_payment - interest;
        balance -= principal;

        // Final period absorbs accumulated drift
        balance = if payment_number == term_months {
            Decimal::ZERO
        } else {
            balance.max(Decimal::ZERO)
        };

        schedule.push(AmortizationScheduleEntry {
            payment_number,
            payment_amount: round_currency(monthly_payment),
            principal_amount: round_currency(principal),
            interest_amount: round_currency(interest),
            remaining_balance: round_currency(balance),
        });
    }

    schedule
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
