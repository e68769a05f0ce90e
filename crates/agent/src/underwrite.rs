//! Underwriting adapter
//!
//! Bridges the pure eligibility rules to the conversation: pulls the
//! facts out of the session, runs the rules once, writes the outcome
//! back, and renders the decision as a reply.
//!
//! The decision is final for the life of the session. Re-running in a
//! terminal state returns a fixed acknowledgement and changes nothing.

use tracing::info;

use loan_officer_config::constants::negotiation;
use loan_officer_core::{format_inr, ConversationState, LoanSession};
use loan_officer_underwriting::{decide, Decision, LoanFacts};

/// Reply when underwriting is re-invoked after a decision
pub const ALREADY_DECIDED: &str = "Decision already made.";

/// Reply when the session is missing facts underwriting needs
pub const MISSING_DETAILS: &str =
    "Some required details are missing. Please complete the loan details and salary first.";

/// Evaluate eligibility for the session and render the outcome.
///
/// Moves the session into `Approved` or `Rejected` and stores the
/// derived credit score, unless a guard short-circuits first.
pub fn evaluate(session: &mut LoanSession) -> String {
    if session.state.is_terminal() {
        return ALREADY_DECIDED.to_string();
    }

    let (Some(loan_amount), Some(tenure_months), Some(emi), Some(salary)) = (
        session.loan_amount,
        session.tenure_months,
        session.emi,
        session.salary,
    ) else {
        return MISSING_DETAILS.to_string();
    };

    let interest_rate = session
        .interest_rate
        .unwrap_or(negotiation::DEFAULT_INTEREST_RATE);

    let facts = LoanFacts {
        loan_amount,
        tenure_months,
        interest_rate,
        emi,
        salary,
    };
    let decision = decide(&facts);

    session.credit_score = Some(decision.credit_score);

    info!(
        status = ?decision.status,
        credit_score = decision.credit_score,
        loan_amount,
        "underwriting decision"
    );

    if decision.is_approved() {
        session.state = ConversationState::Approved;
        render_approval(&facts, &decision)
    } else {
        session.state = ConversationState::Rejected;
        render_rejection(&facts, &decision)
    }
}

fn render_approval(facts: &LoanFacts, decision: &Decision) -> String {
    let mut lines = vec![
        "Good news! Your profile is eligible for this loan.".to_string(),
        String::new(),
        format!("• Loan Amount: ₹{}", format_inr(facts.loan_amount)),
        format!("• Tenure: {} months", facts.tenure_months),
        format!("• Interest Rate: {:.1}% p.a.", facts.interest_rate),
        format!("• Estimated EMI: ₹{} per month", format_inr(facts.emi)),
        format!("• Derived Credit Score: {}", decision.credit_score),
    ];

    if let Some(dti) = decision.dti {
        lines.push(format!("• EMI-to-Income Ratio: {:.1}%", dti * 100.0));
    }

    lines.push(String::new());
    lines.push(decision.reason.clone());
    lines.push(String::new());
    lines.push(
        "I'm generating your sanction letter now. \
         Use Download Sanction Letter to view it."
            .to_string(),
    );

    lines.join("\n")
}

fn render_rejection(facts: &LoanFacts, decision: &Decision) -> String {
    let mut lines = vec![
        "Unfortunately, your current profile doesn't meet our policy criteria.".to_string(),
        String::new(),
        format!("Reason: {}", decision.reason),
    ];

    match decision.suggested_amount {
        Some(suggested) if suggested < facts.loan_amount => {
            lines.push(String::new());
            lines.push(format!(
                "Based on your income, you could be eligible for a lower amount \
                 of around ₹{} for the same tenure ({} months).",
                format_inr(suggested),
                facts.tenure_months
            ));
            lines.push("You can try again with a lower loan amount or a longer tenure.".to_string());
        }
        Some(_) => {
            lines.push(String::new());
            lines.push(
                "You may try reducing the EMI by either lowering the amount \
                 or increasing the tenure."
                    .to_string(),
            );
        }
        None => {
            lines.push(String::new());
            lines.push(
                "You may try reducing the loan amount or increasing the tenure, \
                 or speak to a human loan officer for alternatives."
                    .to_string(),
            );
        }
    }

    lines.join("\n")
}
