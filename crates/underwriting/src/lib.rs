//! Credit engine for the digital loan officer
//!
//! Pure, synchronous financial logic:
//! - EMI amortization and its inverse ([`emi`])
//! - Salary-derived demo credit score ([`credit`])
//! - The sequential eligibility rules ([`rules`])
//!
//! Nothing in here touches a session store or the network; the agent
//! crate adapts decisions into conversation turns.

pub mod credit;
pub mod emi;
pub mod rules;

pub use credit::credit_score_from_salary;
pub use emi::{calculate_emi, max_affordable_principal};
pub use rules::{decide, Decision, DecisionStatus, LoanFacts};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnderwritingError {
    #[error("Tenure must be positive, got {0} months")]
    InvalidTenure(i64),
}
