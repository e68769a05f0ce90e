//! Conversation state and the per-applicant session record
//!
//! The session is the sole stateful entity in the system. It is keyed
//! by an opaque session id owned by the transport layer; the dialogue
//! engine has exclusive write access to one record for the duration of
//! a turn.

use serde::{Deserialize, Serialize};

/// Conversation state
///
/// Intended order:
/// `Init → AskName → AskPhone → AskLoanAmount → Sales ⇄ Sales →
/// AskSalary → AskPan → WaitUpload → Underwrite → {Approved | Rejected}`.
///
/// `Approved` and `Rejected` are terminal; only the global menu reset
/// leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationState {
    /// Fresh session, greeting not yet sent
    #[default]
    Init,
    /// Waiting for the applicant's full name
    AskName,
    /// Waiting for a 10-digit mobile number
    AskPhone,
    /// Waiting for the first requested loan amount
    AskLoanAmount,
    /// EMI negotiation loop (amount/tenure edits, relief, acceptance)
    Sales,
    /// Waiting for the declared monthly net salary
    AskSalary,
    /// Waiting for the PAN
    AskPan,
    /// Waiting for the salary slip on the upload side channel
    WaitUpload,
    /// Administrative path: run eligibility on the next turn
    Underwrite,
    /// Loan sanctioned
    Approved,
    /// Application declined
    Rejected,
}

impl ConversationState {
    /// Wire name used in API responses and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Init => "INIT",
            ConversationState::AskName => "ASK_NAME",
            ConversationState::AskPhone => "ASK_PHONE",
            ConversationState::AskLoanAmount => "ASK_LOAN_AMOUNT",
            ConversationState::Sales => "SALES",
            ConversationState::AskSalary => "ASK_SALARY",
            ConversationState::AskPan => "ASK_PAN",
            ConversationState::WaitUpload => "WAIT_UPLOAD",
            ConversationState::Underwrite => "UNDERWRITE",
            ConversationState::Approved => "APPROVED",
            ConversationState::Rejected => "REJECTED",
        }
    }

    /// Whether the conversation has reached a decision
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversationState::Approved | ConversationState::Rejected
        )
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-applicant session record
///
/// Invariant: whenever `loan_amount`, `interest_rate`, and
/// `tenure_months` are set, `emi` holds the installment computed from
/// exactly those three values. The negotiation engine recomputes it on
/// every mutation; no other component writes the offer fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanSession {
    /// Drives all dialogue branching
    pub state: ConversationState,
    /// Applicant's full name, trimmed, non-empty once set
    pub name: Option<String>,
    /// Mobile number, digits only, at least 10 digits once set
    pub phone: Option<String>,
    /// Requested principal in whole rupees
    pub loan_amount: Option<i64>,
    /// Repayment duration in months
    pub tenure_months: Option<u32>,
    /// Annual interest rate, percent
    pub interest_rate: Option<f64>,
    /// Equated monthly installment in whole rupees
    pub emi: Option<i64>,
    /// Monthly net salary; a document-verified figure supersedes a
    /// typed one
    pub salary: Option<i64>,
    /// PAN as entered, spaces stripped, otherwise unvalidated
    pub pan: Option<String>,
    /// Synthetic score derived from salary by the eligibility engine
    pub credit_score: Option<u16>,
}

impl LoanSession {
    /// Fresh record in the Init state
    pub fn new() -> Self {
        Self::default()
    }

    /// Global menu reset: wipe every field and land in AskName
    ///
    /// The reset deliberately skips Init so the applicant is asked for
    /// their name immediately instead of seeing the greeting twice.
    pub fn reset_to_name(&mut self) {
        *self = Self {
            state: ConversationState::AskName,
            ..Self::default()
        };
    }

    /// All facts the eligibility engine needs are present
    pub fn has_underwriting_facts(&self) -> bool {
        self.loan_amount.is_some()
            && self.tenure_months.is_some()
            && self.emi.is_some()
            && self.salary.is_some()
    }
}
