//! EMI amortization
//!
//! Standard reducing-balance formula:
//!
//! ```text
//! EMI = P * r * (1 + r)^N / ((1 + r)^N - 1)
//! ```
//!
//! where `P` is the principal, `r` the monthly rate
//! (`annual_rate / 12 / 100`), and `N` the number of monthly
//! installments. Zero-interest offers degrade to straight division.

use crate::UnderwritingError;

/// Calculate the EMI for a principal, rounded to the nearest rupee.
///
/// `annual_rate` is a percentage (14.0 means 14% p.a.).
pub fn calculate_emi(
    principal: f64,
    annual_rate: f64,
    months: u32,
) -> Result<i64, UnderwritingError> {
    if months == 0 {
        return Err(UnderwritingError::InvalidTenure(months as i64));
    }

    let monthly_rate = annual_rate / 12.0 / 100.0;

    if monthly_rate == 0.0 {
        return Ok((principal / months as f64).round() as i64);
    }

    let factor = (1.0 + monthly_rate).powi(months as i32);
    let emi = principal * monthly_rate * factor / (factor - 1.0);
    Ok(emi.round() as i64)
}

/// Invert the EMI formula: the largest principal whose EMI stays within
/// `max_emi_ratio` of the monthly salary at the given rate and tenure.
///
/// Returns 0 when the salary or tenure makes the question meaningless.
pub fn max_affordable_principal(
    monthly_salary: f64,
    annual_rate: f64,
    months: u32,
    max_emi_ratio: f64,
) -> i64 {
    if monthly_salary <= 0.0 || months == 0 {
        return 0;
    }

    let allowed_emi = monthly_salary * max_emi_ratio;
    let monthly_rate = annual_rate / 12.0 / 100.0;

    if monthly_rate == 0.0 {
        return (allowed_emi * months as f64) as i64;
    }

    let factor = (1.0 + monthly_rate).powi(months as i32);
    let principal = allowed_emi * (factor - 1.0) / (monthly_rate * factor);
    principal as i64
}
