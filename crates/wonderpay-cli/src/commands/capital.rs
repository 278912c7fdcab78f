use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use wonderpay_core::capital::{self, LoanCalculationRequest};

use crate::input;

/// Arguments for a capital loan calculation
#[derive(Args)]
pub struct CapitalArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal to borrow
    #[arg(long, allow_hyphen_values = true)]
    pub loan_amount: Option<Decimal>,

    /// Term of the loan in months
    #[arg(long, allow_hyphen_values = true)]
    pub term_months: Option<i64>,

    /// Annual nominal interest rate as a decimal (0.065 = 6.5%); defaults to the base rate
    #[arg(long, allow_hyphen_values = true)]
    pub interest_rate: Option<Decimal>,
}

pub fn run_capital_calculate(args: CapitalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => request_from_flags(&args)?,
    };

    let result = capital::model_loan(&request)?;
    Ok(serde_json::to_value(result)?)
}

/// Build a request from individual flags. Range checks are left to the engine
/// so flag and JSON input report the same errors.
fn request_from_flags(
    args: &CapitalArgs,
) -> Result<LoanCalculationRequest, Box<dyn std::error::Error>> {
    let loan_amount = args
        .loan_amount
        .ok_or("--loan-amount is required (or provide --input)")?;
    let term_months = args
        .term_months
        .ok_or("--term-months is required (or provide --input)")?;

    Ok(LoanCalculationRequest {
        loan_amount: Some(loan_amount.into()),
        term_months: Some(capital::NumericInput::Number(term_months.into())),
        interest_rate: args.interest_rate.map(Into::into),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wonderpay_core::capital::RateSource;

    fn flags(loan: Option<Decimal>, term: Option<i64>, rate: Option<Decimal>) -> CapitalArgs {
        CapitalArgs {
            input: None,
            loan_amount: loan,
            term_months: term,
            interest_rate: rate,
        }
    }

    #[test]
    fn test_flags_build_request() {
        let args = flags(Some(dec!(150000)), Some(36), Some(dec!(0.065)));
        let request = request_from_flags(&args).unwrap();
        let terms = request.to_terms().unwrap();
        assert_eq!(terms.loan_amount, dec!(150000));
        assert_eq!(terms.term_months, 36);
        assert_eq!(terms.interest_rate, Some(dec!(0.065)));
    }

    #[test]
    fn test_flags_without_rate_use_default() {
        let request = request_from_flags(&flags(Some(dec!(10000)), Some(36), None)).unwrap();
        assert_eq!(request.to_terms().unwrap().rate_source, RateSource::Default);
    }

    #[test]
    fn test_missing_flags_reported() {
        let err = request_from_flags(&flags(None, Some(12), None)).unwrap_err();
        assert!(err.to_string().contains("--loan-amount"));

        let err = request_from_flags(&flags(Some(dec!(100)), None, None)).unwrap_err();
        assert!(err.to_string().contains("--term-months"));
    }

    #[test]
    fn test_negative_term_reaches_engine_validation() {
        let request = request_from_flags(&flags(Some(dec!(100)), Some(-3), None)).unwrap();
        let err = capital::model_loan(&request).unwrap_err();
        assert_eq!(err.field(), Some("term_months"));
    }
}
