//! Salary-derived demo credit score
//!
//! There is no bureau integration; the score is a deterministic
//! function of declared income so decisions stay explainable:
//!
//! ```text
//! score = min(800, 620 + (salary / 1000) * 2)
//! ```

use loan_officer_config::constants::credit_score;

/// Derive a credit score from monthly salary.
///
/// Non-positive salaries score 0, which fails every score threshold.
pub fn credit_score_from_salary(salary: i64) -> u16 {
    if salary <= 0 {
        return 0;
    }

    let bump = (salary as f64 / 1000.0) * credit_score::BUMP_PER_THOUSAND;
    let score = credit_score::BASE as f64 + bump;
    (score as u16).min(credit_score::CAP)
}
