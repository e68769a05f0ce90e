//! Slot extraction from free text
//!
//! Deliberately simple: the first run of digits wins, commas are
//! stripped first so "3,00,000" and "300,000" both read as 300000.
//! No NLU, no spelled-out numbers.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// First integer appearing in the text, commas stripped.
///
/// Returns `None` when there are no digits or the run overflows `i64`.
pub fn first_number(text: &str) -> Option<i64> {
    let cleaned = text.replace(',', "");
    let m = DIGIT_RUN.find(&cleaned)?;
    m.as_str().parse().ok()
}

/// Parse a tenure edit from free text, in months.
///
/// The number is taken as months unless the text mentions years, in
/// which case it is multiplied by 12. A message with tenure keywords
/// but no number ("a bit longer please") keeps the current tenure.
/// A result of 0 means the applicant asked for an impossible tenure.
pub fn parse_tenure_months(text: &str, fallback_months: u32) -> u32 {
    let lower = text.to_lowercase();
    let number = match first_number(&lower) {
        Some(n) => n,
        None => return fallback_months,
    };

    let months = if lower.contains("year") {
        number.saturating_mul(12)
    } else {
        number
    };

    months.clamp(0, u32::MAX as i64) as u32
}

/// Keep only the digits of the text, preserving order.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_basic() {
        assert_eq!(first_number("300000"), Some(300_000));
        assert_eq!(first_number("try 250000 please"), Some(250_000));
        assert_eq!(first_number("no digits here"), None);
        assert_eq!(first_number(""), None);
    }

    #[test]
    fn test_first_number_strips_commas() {
        assert_eq!(first_number("3,00,000"), Some(300_000));
        assert_eq!(first_number("300,000"), Some(300_000));
    }

    #[test]
    fn test_first_number_takes_first_run() {
        assert_eq!(first_number("36 months on 300000"), Some(36));
    }

    #[test]
    fn test_tenure_months_plain() {
        assert_eq!(parse_tenure_months("make it 36 months", 24), 36);
        assert_eq!(parse_tenure_months("36", 24), 36);
    }

    #[test]
    fn test_tenure_years_multiplied() {
        assert_eq!(parse_tenure_months("for 3 years", 24), 36);
        assert_eq!(parse_tenure_months("5 YEARS", 24), 60);
    }

    #[test]
    fn test_tenure_no_number_keeps_current() {
        assert_eq!(parse_tenure_months("a bit longer please", 24), 24);
    }

    #[test]
    fn test_tenure_zero_flags_invalid() {
        assert_eq!(parse_tenure_months("0 months", 24), 0);
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("98-765 43210"), "9876543210");
        assert_eq!(digits_only("no digits"), "");
    }
}
