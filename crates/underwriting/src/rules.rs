//! Sequential eligibility rules
//!
//! Rules fire in a fixed order and the first failure wins, so the
//! rejection reason is always the single most fundamental problem:
//!
//! 1. Minimum monthly income
//! 2. Minimum derived credit score
//! 3. EMI-to-income ratio cap
//! 4. Loan cap as a multiple of annual income
//!
//! A rejection carries a suggested lower amount (the affordable
//! principal at the DTI cap, clamped by the income-multiple cap) except
//! when income itself is below the floor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use loan_officer_config::constants::policy;
use loan_officer_core::format_inr;

use crate::credit::credit_score_from_salary;
use crate::emi::max_affordable_principal;

/// Everything the rules need about one application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanFacts {
    /// Requested principal in whole rupees
    pub loan_amount: i64,
    /// Tenure in months
    pub tenure_months: u32,
    /// Annual interest rate, percent
    pub interest_rate: f64,
    /// EMI for the requested offer, whole rupees
    pub emi: i64,
    /// Monthly net salary, whole rupees
    pub salary: i64,
}

/// Outcome of the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Approved,
    Rejected,
}

/// A decision with its full rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub status: DecisionStatus,
    /// Human-readable explanation of the binding rule
    pub reason: String,
    /// Derived credit score for this salary
    pub credit_score: u16,
    /// EMI-to-income ratio; `None` when salary is non-positive
    pub dti: Option<f64>,
    /// Income-multiple cap on the principal
    pub max_allowed_loan: i64,
    /// Lower amount the applicant could afford, when one exists
    pub suggested_amount: Option<i64>,
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        self.status == DecisionStatus::Approved
    }
}

/// Run the eligibility rules over one application.
pub fn decide(facts: &LoanFacts) -> Decision {
    let salary = facts.salary;
    let dti = if salary > 0 {
        Some(facts.emi as f64 / salary as f64)
    } else {
        None
    };

    let annual_income = salary * 12;
    let max_allowed_loan = policy::MAX_LOAN_INCOME_MULTIPLE * annual_income;

    let credit_score = credit_score_from_salary(salary);

    let suggested_by_dti = max_affordable_principal(
        salary as f64,
        facts.interest_rate,
        facts.tenure_months,
        policy::MAX_DTI,
    );
    let suggested_amount = if suggested_by_dti > 0 {
        Some(suggested_by_dti.min(max_allowed_loan))
    } else {
        None
    };

    debug!(
        salary,
        credit_score,
        ?dti,
        max_allowed_loan,
        requested = facts.loan_amount,
        "running eligibility rules"
    );

    // 1) Minimum income. No suggestion here: if income is below the
    // floor, no amount at this tenure would be approvable.
    if salary < policy::MIN_INCOME {
        return Decision {
            status: DecisionStatus::Rejected,
            reason: format!(
                "Monthly income ₹{} is below the minimum required ₹{}.",
                format_inr(salary),
                format_inr(policy::MIN_INCOME)
            ),
            credit_score,
            dti,
            max_allowed_loan,
            suggested_amount: None,
        };
    }

    // 2) Minimum credit score
    if credit_score < policy::MIN_CREDIT_SCORE {
        return Decision {
            status: DecisionStatus::Rejected,
            reason: format!(
                "Derived credit score {credit_score} is below the required minimum of {}.",
                policy::MIN_CREDIT_SCORE
            ),
            credit_score,
            dti,
            max_allowed_loan,
            suggested_amount,
        };
    }

    // 3) DTI cap
    if let Some(ratio) = dti {
        if ratio > policy::MAX_DTI {
            return Decision {
                status: DecisionStatus::Rejected,
                reason: format!(
                    "EMI-to-income ratio is {:.1}% which exceeds our limit of {:.0}%.",
                    ratio * 100.0,
                    policy::MAX_DTI * 100.0
                ),
                credit_score,
                dti,
                max_allowed_loan,
                suggested_amount,
            };
        }
    }

    // 4) Income-multiple cap
    if facts.loan_amount > max_allowed_loan {
        return Decision {
            status: DecisionStatus::Rejected,
            reason: format!(
                "Requested amount ₹{} is higher than the maximum allowed (~₹{}) based on your income.",
                format_inr(facts.loan_amount),
                format_inr(max_allowed_loan)
            ),
            credit_score,
            dti,
            max_allowed_loan,
            suggested_amount,
        };
    }

    let ratio = dti.unwrap_or(0.0);
    Decision {
        status: DecisionStatus::Approved,
        reason: format!(
            "Profile approved based on income, EMI-to-income ratio {:.1}% and credit score {credit_score}.",
            ratio * 100.0
        ),
        credit_score,
        dti,
        max_allowed_loan,
        suggested_amount: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emi::calculate_emi;

    fn facts(amount: i64, tenure: u32, salary: i64) -> LoanFacts {
        LoanFacts {
            loan_amount: amount,
            tenure_months: tenure,
            interest_rate: 14.0,
            emi: calculate_emi(amount as f64, 14.0, tenure).unwrap(),
            salary,
        }
    }

    #[test]
    fn test_reference_approval() {
        // 3L over 24 months on a 50k salary: dti ≈ 0.288, score 720
        let decision = decide(&facts(300_000, 24, 50_000));
        assert!(decision.is_approved());
        assert_eq!(decision.credit_score, 720);
        let dti = decision.dti.unwrap();
        assert!(dti > 0.28 && dti < 0.30, "dti {dti}");
        assert!(decision.suggested_amount.is_none());
        assert!(decision.reason.contains("credit score 720"));
    }

    #[test]
    fn test_low_income_rejection_has_no_suggestion() {
        let decision = decide(&facts(300_000, 24, 20_000));
        assert_eq!(decision.status, DecisionStatus::Rejected);
        assert!(decision.reason.contains("below the minimum required"));
        assert!(decision.suggested_amount.is_none());
    }

    #[test]
    fn test_income_rule_fires_before_dti() {
        // 20k salary fails income AND dti; the reason must be income
        let f = facts(300_000, 24, 20_000);
        assert!(f.emi as f64 / f.salary as f64 > policy::MAX_DTI);

        let decision = decide(&f);
        assert!(decision.reason.contains("Monthly income"));
    }

    #[test]
    fn test_dti_rejection_suggests_lower_amount() {
        // 6L over 24 months on a 30k salary: score passes (680) but
        // EMI ≈ 28.8k blows the 45% ratio
        let decision = decide(&facts(600_000, 24, 30_000));
        assert_eq!(decision.status, DecisionStatus::Rejected);
        assert!(decision.reason.contains("EMI-to-income ratio"));

        let suggested = decision.suggested_amount.unwrap();
        assert!(suggested > 0);
        assert!(suggested < 600_000);

        // The suggestion itself must be affordable
        let suggested_emi = calculate_emi(suggested as f64, 14.0, 24).unwrap();
        assert!(suggested_emi as f64 <= 30_000.0 * policy::MAX_DTI + 1.0);
    }

    #[test]
    fn test_credit_score_rejection_band() {
        // 27k salary clears the income floor but scores 674, under the
        // 680 score floor
        let decision = decide(&facts(100_000, 24, 27_000));
        assert_eq!(decision.status, DecisionStatus::Rejected);
        assert_eq!(decision.credit_score, 674);
        assert!(decision.reason.contains("Derived credit score 674"));
        assert!(decision.suggested_amount.is_some());
    }

    #[test]
    fn test_income_multiple_cap() {
        // 25L on a 50k salary is above 4x annual income (24L); pin the
        // EMI under the ratio cap so rule 4 is the binding one
        let mut f = facts(2_500_000, 60, 50_000);
        f.emi = (50_000.0 * 0.40) as i64;

        let decision = decide(&f);
        assert_eq!(decision.status, DecisionStatus::Rejected);
        assert!(decision.reason.contains("maximum allowed"));
        assert_eq!(decision.max_allowed_loan, 2_400_000);
    }

    #[test]
    fn test_zero_salary_has_no_dti() {
        let decision = decide(&facts(300_000, 24, 0));
        assert_eq!(decision.status, DecisionStatus::Rejected);
        assert_eq!(decision.credit_score, 0);
        assert!(decision.dti.is_none());
    }

    #[test]
    fn test_suggestion_clamped_by_income_multiple() {
        // A long tenure can push the DTI-affordable principal above the
        // 4x-annual-income cap; the suggestion must respect the cap.
        let salary = 30_000;
        let by_dti = max_affordable_principal(salary as f64, 14.0, 60, policy::MAX_DTI);
        let cap = policy::MAX_LOAN_INCOME_MULTIPLE * salary * 12;

        let decision = decide(&facts(5_000_000, 60, salary));
        assert_eq!(decision.status, DecisionStatus::Rejected);
        let suggested = decision.suggested_amount.unwrap();
        assert_eq!(suggested, by_dti.min(cap));
    }
}
