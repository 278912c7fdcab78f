//! Capital loan calculator: fixed-payment amortization for WonderPay Capital
//! offers, plus decoding of the loosely typed request the dashboard sends.

pub mod amortization;
pub mod request;

pub use amortization::{
    calculate, calculate_from_request, model_loan, AmortizationScheduleEntry,
    LoanCalculationResult, BASE_ANNUAL_RATE,
};
pub use request::{LoanCalculationRequest, LoanTerms, NumericInput, RateSource};
