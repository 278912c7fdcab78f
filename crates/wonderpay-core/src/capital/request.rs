//! Wire-level loan request.
//!
//! The dashboard posts form values as either JSON numbers or strings, so every
//! field is decoded leniently here and validated into [`LoanTerms`] before the
//! engine sees it.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WonderPayError;
use crate::types::{Money, Months, Rate};
use crate::WonderPayResult;

/// A numeric field as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
    /// Booleans, arrays and objects. Never numeric.
    Other(serde_json::Value),
}

impl NumericInput {
    /// Parse into a decimal, or `None` if the value is not a finite number.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            NumericInput::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Decimal::from(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Decimal::from(u))
                } else {
                    n.as_f64().and_then(Decimal::from_f64)
                }
            }
            NumericInput::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .ok()
                    // Beyond 28 decimal places: resolve as a JSON number would
                    .or_else(|| f64::from_str(trimmed).ok().and_then(Decimal::from_f64))
            }
            NumericInput::Other(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.clone(),
            NumericInput::Other(v) => v.to_string(),
        }
    }
}

impl From<Decimal> for NumericInput {
    fn from(value: Decimal) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<u32> for NumericInput {
    fn from(value: u32) -> Self {
        NumericInput::Number(value.into())
    }
}

/// Body of `POST /api/capital/calculate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanCalculationRequest {
    #[serde(default)]
    pub loan_amount: Option<NumericInput>,
    #[serde(default)]
    pub term_months: Option<NumericInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<NumericInput>,
}

/// Where the rate used for a calculation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Supplied,
    /// Caller omitted the rate.
    Default,
    /// Caller sent something that does not parse as a number.
    Unparseable,
}

/// Validated engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: Money,
    pub term_months: Months,
    /// `None` means the base rate applies.
    pub interest_rate: Option<Rate>,
    pub rate_source: RateSource,
}

impl LoanCalculationRequest {
    /// Decode a JSON request body.
    pub fn from_json(body: &str) -> WonderPayResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn new(
        loan_amount: impl Into<NumericInput>,
        term_months: impl Into<NumericInput>,
        interest_rate: Option<Decimal>,
    ) -> Self {
        Self {
            loan_amount: Some(loan_amount.into()),
            term_months: Some(term_months.into()),
            interest_rate: interest_rate.map(NumericInput::from),
        }
    }

    /// Validate every field. Fails on the first offending field, checked in
    /// declaration order.
    pub fn to_terms(&self) -> WonderPayResult<LoanTerms> {
        let loan_amount = parse_loan_amount(self.loan_amount.as_ref())?;
        let term_months = parse_term_months(self.term_months.as_ref())?;
        let (interest_rate, rate_source) = parse_interest_rate(self.interest_rate.as_ref());

        Ok(LoanTerms {
            loan_amount,
            term_months,
            interest_rate,
            rate_source,
        })
    }
}

fn parse_loan_amount(raw: Option<&NumericInput>) -> WonderPayResult<Money> {
    let raw = raw.ok_or_else(|| WonderPayError::InvalidInput {
        field: "loan_amount".into(),
        reason: "Loan amount is required".into(),
    })?;
    let amount = raw.to_decimal().ok_or_else(|| WonderPayError::InvalidInput {
        field: "loan_amount".into(),
        reason: format!("'{}' is not a number", raw.describe()),
    })?;
    if amount <= Decimal::ZERO {
        return Err(WonderPayError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    Ok(amount)
}

fn parse_term_months(raw: Option<&NumericInput>) -> WonderPayResult<Months> {
    let raw = raw.ok_or_else(|| WonderPayError::InvalidInput {
        field: "term_months".into(),
        reason: "Term in months is required".into(),
    })?;
    let term = raw.to_decimal().ok_or_else(|| WonderPayError::InvalidInput {
        field: "term_months".into(),
        reason: format!("'{}' is not a number", raw.describe()),
    })?;
    if !term.fract().is_zero() {
        return Err(WonderPayError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term must be a whole number of months, got {term}"),
        });
    }
    if term <= Decimal::ZERO {
        return Err(WonderPayError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    term.to_u32().ok_or_else(|| WonderPayError::InvalidInput {
        field: "term_months".into(),
        reason: format!("Term of {term} months is out of range (max {})", u32::MAX),
    })
}

/// Never fails: a rate that does not parse falls back to the base rate.
/// Range checks belong to the engine.
fn parse_interest_rate(raw: Option<&NumericInput>) -> (Option<Rate>, RateSource) {
    let Some(raw) = raw else {
        return (None, RateSource::Default);
    };
    match raw.to_decimal() {
        Some(rate) => (Some(rate), RateSource::Supplied),
        None => (None, RateSource::Unparseable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn decode(body: &str) -> LoanCalculationRequest {
        serde_json::from_str(body).unwrap()
    }

    fn field_of(err: WonderPayError) -> String {
        err.field().unwrap_or_default().to_string()
    }

    #[test]
    fn test_numbers_decode() {
        let terms = decode(r#"{"loan_amount": 150000, "term_months": 36, "interest_rate": 0.065}"#)
            .to_terms()
            .unwrap();
        assert_eq!(
            terms,
            LoanTerms {
                loan_amount: dec!(150000),
                term_months: 36,
                interest_rate: Some(dec!(0.065)),
                rate_source: RateSource::Supplied,
            }
        );
    }

    #[test]
    fn test_strings_decode() {
        let body = r#"{"loan_amount": " 2500.50 ", "term_months": "12", "interest_rate": "0.08"}"#;
        let terms = decode(body).to_terms().unwrap();
        assert_eq!(terms.loan_amount, dec!(2500.50));
        assert_eq!(terms.term_months, 12);
        assert_eq!(terms.interest_rate, Some(dec!(0.08)));
    }

    #[test]
    fn test_scientific_notation_string() {
        let terms = decode(r#"{"loan_amount": "1.5e5", "term_months": 36}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.loan_amount, dec!(150000));
    }

    #[test]
    fn test_missing_rate_uses_default() {
        let terms = decode(r#"{"loan_amount": 10000, "term_months": 36}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.interest_rate, None);
        assert_eq!(terms.rate_source, RateSource::Default);
    }

    #[test]
    fn test_null_rate_uses_default() {
        let terms = decode(r#"{"loan_amount": 10000, "term_months": 36, "interest_rate": null}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.rate_source, RateSource::Default);
    }

    #[test]
    fn test_unparseable_rate_falls_back() {
        for body in [
            r#"{"loan_amount": 10000, "term_months": 36, "interest_rate": "abc"}"#,
            r#"{"loan_amount": 10000, "term_months": 36, "interest_rate": ""}"#,
            r#"{"loan_amount": 10000, "term_months": 36, "interest_rate": true}"#,
        ] {
            let terms = decode(body).to_terms().unwrap();
            assert_eq!(terms.interest_rate, None, "body: {body}");
            assert_eq!(terms.rate_source, RateSource::Unparseable, "body: {body}");
        }
    }

    #[test]
    fn test_negative_rate_is_supplied() {
        let terms = decode(r#"{"loan_amount": 10000, "term_months": 36, "interest_rate": -0.01}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.interest_rate, Some(dec!(-0.01)));
        assert_eq!(terms.rate_source, RateSource::Supplied);
    }

    #[test]
    fn test_tiny_rate_string_resolves_like_number() {
        let text = decode(r#"{"loan_amount": 1000, "term_months": 12, "interest_rate": "1e-30"}"#)
            .to_terms()
            .unwrap();
        let number = decode(r#"{"loan_amount": 1000, "term_months": 12, "interest_rate": 1e-30}"#)
            .to_terms()
            .unwrap();
        assert_eq!(text.rate_source, RateSource::Supplied);
        assert_eq!(text, number);
    }

    #[test]
    fn test_non_finite_rate_strings_unparseable() {
        for rate in ["NaN", "inf", "-infinity", "1e400"] {
            assert_eq!(NumericInput::Text(rate.into()).to_decimal(), None, "rate: {rate}");
        }
    }

    #[test]
    fn test_zero_rate_is_supplied() {
        let terms = decode(r#"{"loan_amount": 1200, "term_months": 12, "interest_rate": 0}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.interest_rate, Some(Decimal::ZERO));
        assert_eq!(terms.rate_source, RateSource::Supplied);
    }

    #[test]
    fn test_bad_loan_amounts() {
        for body in [
            r#"{"term_months": 12}"#,
            r#"{"loan_amount": null, "term_months": 12}"#,
            r#"{"loan_amount": "ten", "term_months": 12}"#,
            r#"{"loan_amount": 0, "term_months": 12}"#,
            r#"{"loan_amount": -100, "term_months": 12}"#,
            r#"{"loan_amount": [1], "term_months": 12}"#,
        ] {
            let err = decode(body).to_terms().unwrap_err();
            assert_eq!(field_of(err), "loan_amount", "body: {body}");
        }
    }

    #[test]
    fn test_bad_terms() {
        for body in [
            r#"{"loan_amount": 100}"#,
            r#"{"loan_amount": 100, "term_months": 0}"#,
            r#"{"loan_amount": 100, "term_months": -6}"#,
            r#"{"loan_amount": 100, "term_months": 12.5}"#,
            r#"{"loan_amount": 100, "term_months": "twelve"}"#,
            r#"{"loan_amount": 100, "term_months": 4294967296}"#,
        ] {
            let err = decode(body).to_terms().unwrap_err();
            assert_eq!(field_of(err), "term_months", "body: {body}");
        }
    }

    #[test]
    fn test_integral_decimal_term_accepted() {
        let terms = decode(r#"{"loan_amount": 100, "term_months": 12.0}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.term_months, 12);

        let terms = decode(r#"{"loan_amount": 100, "term_months": "24.00"}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.term_months, 24);
    }

    #[test]
    fn test_long_term_accepted() {
        let terms = decode(r#"{"loan_amount": 100, "term_months": 1201}"#)
            .to_terms()
            .unwrap();
        assert_eq!(terms.term_months, 1201);
    }

    #[test]
    fn test_from_json_reports_serialization_error() {
        let err = LoanCalculationRequest::from_json("{loan_amount: 1").unwrap_err();
        assert!(matches!(err, WonderPayError::SerializationError(_)));
        assert!(err.is_client_error());

        let request = LoanCalculationRequest::from_json(r#"{"loan_amount": 1, "term_months": 2}"#)
            .unwrap();
        assert_eq!(request.to_terms().unwrap().term_months, 2);
    }

    #[test]
    fn test_loan_amount_checked_before_term() {
        let err = decode(r#"{"loan_amount": -1, "term_months": 0}"#)
            .to_terms()
            .unwrap_err();
        assert_eq!(field_of(err), "loan_amount");
    }

    #[test]
    fn test_new_round_trips_through_terms() {
        let request = LoanCalculationRequest::new(dec!(5000), 24u32, Some(dec!(0.1)));
        let terms = request.to_terms().unwrap();
        assert_eq!(terms.loan_amount, dec!(5000));
        assert_eq!(terms.term_months, 24);
        assert_eq!(terms.interest_rate, Some(dec!(0.1)));
    }
}
