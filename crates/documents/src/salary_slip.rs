//! Salary extraction from uploaded slips
//!
//! Best effort over whatever text the upload yields: digit runs of 4-7
//! characters are the candidates, annual figures (3L-20L) are divided
//! by 12, plausible monthly figures (25k-200k) pass through, and the
//! largest surviving candidate wins. Anything outside the plausible
//! band, and any slip we cannot read at all, falls back to a demo-safe
//! ₹45,000 so a bad scan never dead-ends the conversation.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use loan_officer_config::constants::documents;

static SALARY_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4,7}").expect("valid regex"));

const ANNUAL_MIN: i64 = 300_000;
const ANNUAL_MAX: i64 = 2_000_000;
const MONTHLY_MIN: i64 = 25_000;
const MONTHLY_MAX: i64 = 200_000;

/// Pull a monthly-salary-like number out of slip text, if any.
fn extract_salary(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }

    let cleaned = text.replace(',', "");

    SALARY_CANDIDATE
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<i64>().ok())
        .filter_map(|n| {
            if (ANNUAL_MIN..=ANNUAL_MAX).contains(&n) {
                // Looks like an annual CTC; convert to monthly
                Some(n / 12)
            } else if (MONTHLY_MIN..=MONTHLY_MAX).contains(&n) {
                Some(n)
            } else {
                None
            }
        })
        .max()
}

/// Verified monthly salary for an uploaded slip. Always succeeds.
///
/// The caller passes whatever text the upload yields (a lossy scan of
/// the bytes is fine); implausible or absent figures fall back to the
/// configured demo salary.
pub fn verified_monthly_salary(slip_text: &str) -> i64 {
    match extract_salary(slip_text) {
        Some(salary)
            if (documents::MIN_PLAUSIBLE_SALARY..=documents::MAX_PLAUSIBLE_SALARY)
                .contains(&salary) =>
        {
            debug!(salary, "salary extracted from slip");
            salary
        }
        other => {
            debug!(candidate = ?other, "slip unusable, using fallback salary");
            documents::FALLBACK_SALARY
        }
    }
}
