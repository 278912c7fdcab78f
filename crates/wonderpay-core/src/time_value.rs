use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::WonderPayError;
use crate::types::{Money, Rate};
use crate::WonderPayResult;

/// The smaller of `(1 + rate)^nper` and `(1 + rate)^-nper`.
///
/// Raising a base below one shrinks toward zero instead of growing, so long
/// terms at high rates stay inside the decimal range.
fn shrinking_factor(rate: Rate, nper: u32) -> WonderPayResult<Decimal> {
    let growth = Decimal::ONE + rate;
    let base = if rate > Decimal::ZERO {
        Decimal::ONE
            .checked_div(growth)
            .ok_or_else(|| WonderPayError::ArithmeticOverflow {
                context: format!("discount base 1 / (1 + {rate})"),
            })?
    } else {
        growth
    };
    base.checked_powu(u64::from(nper))
        .ok_or_else(|| WonderPayError::ArithmeticOverflow {
            context: format!("annuity factor over {nper} periods at {rate}"),
        })
}

/// Level payment that fully amortizes `principal` over `nper` periods at a
/// per-period `rate`.
///
/// Positive rates use `P * r / (1 - (1 + r)^-n)`; negative rates the
/// equivalent `P * |r| * (1 + r)^n / (1 - (1 + r)^n)`. A zero rate has no
/// annuity factor and degenerates to straight-line repayment,
/// `principal / nper`.
pub fn pmt(rate: Rate, nper: u32, principal: Money) -> WonderPayResult<Money> {
    if nper == 0 {
        return Err(WonderPayError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if Decimal::ONE + rate <= Decimal::ZERO {
        return Err(WonderPayError::InvalidInput {
            field: "rate".into(),
            reason: format!("Per-period rate must be greater than -1, got {rate}"),
        });
    }

    let periods = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / periods);
    }

    let shrink = shrinking_factor(rate, nper)?;
    let denominator = Decimal::ONE - shrink;

    // Rates small enough to vanish inside 28 significant digits
    if denominator.is_zero() {
        return Ok(principal / periods);
    }

    let numerator = if rate > Decimal::ZERO {
        principal.checked_mul(rate)
    } else {
        principal
            .checked_mul(rate.abs())
            .and_then(|v| v.checked_mul(shrink))
    };

    numerator
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| WonderPayError::ArithmeticOverflow {
            context: "annuity payment".into(),
        })
}
