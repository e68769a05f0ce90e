//! The EMI negotiation loop
//!
//! Owns every turn in the `AskLoanAmount` and `Sales` states. The
//! interpretation order is fixed and is the contract of the loop:
//!
//! 1. Acceptance keywords → lock the offer, move to salary
//! 2. Tenure keywords → re-amortize at the requested tenure
//! 3. "EMI too high" → stretch tenure by one relief step (cap 60)
//! 4. A fresh number → treat as a new requested amount
//! 5. Otherwise → show the action menu
//!
//! "ok, 36 months" therefore accepts the CURRENT offer; the tenure edit
//! never runs. Keyword checks are substring matches, so "fine" inside
//! "final offer" accepts too. The EMI field is recomputed on every
//! mutation of amount or tenure; stale EMIs never survive a turn.

use tracing::debug;

use loan_officer_config::constants::negotiation;
use loan_officer_core::{format_inr, ConversationState, LoanSession};
use loan_officer_underwriting::calculate_emi;

use crate::extract::{first_number, parse_tenure_months};
use crate::AgentError;

const ACCEPTANCE_KEYWORDS: &[&str] = &["ok", "okay", "yes", "proceed", "looks good", "fine"];

const TENURE_KEYWORDS: &[&str] = &[
    "tenure", "month", "months", "year", "years", "longer", "shorter",
];

const EMI_TOO_HIGH_PHRASES: &[&str] =
    &["too high", "emi too high", "too much", "cant pay", "cannot pay"];

/// Negotiation engine for loan offers
#[derive(Debug, Clone, Default)]
pub struct Negotiator;

impl Negotiator {
    pub fn new() -> Self {
        Self
    }

    /// Handle one negotiation turn, mutating the session's offer.
    pub fn negotiate(
        &self,
        message: &str,
        session: &mut LoanSession,
    ) -> Result<String, AgentError> {
        let text = message.trim();
        let lower = text.to_lowercase();

        // First time: no loan amount yet
        let Some(amount) = session.loan_amount else {
            return self.seed_offer(text, session);
        };

        let tenure = session
            .tenure_months
            .unwrap_or(negotiation::DEFAULT_TENURE_MONTHS);
        let interest = session
            .interest_rate
            .unwrap_or(negotiation::DEFAULT_INTEREST_RATE);
        let emi = session.emi.unwrap_or_default();

        // 1) Accept offer → move on to salary capture
        if ACCEPTANCE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            session.state = ConversationState::AskSalary;
            debug!(amount, tenure, "offer accepted");
            return Ok(format!(
                "Great, we will proceed with this offer:\n\
                 • Loan Amount: ₹{}\n\
                 • Tenure: {} months\n\
                 • Interest Rate: {:.1}% p.a.\n\
                 • Estimated EMI: ₹{} per month\n\n\
                 Now, please tell me your approximate monthly net salary in ₹.",
                format_inr(amount),
                tenure,
                interest,
                format_inr(emi)
            ));
        }

        // 2) Tenure edit
        if TENURE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            let new_tenure = parse_tenure_months(&lower, tenure);
            if new_tenure == 0 {
                return Ok(
                    "Please specify a valid tenure, like '36 months' or '3 years'.".to_string(),
                );
            }

            let emi = calculate_emi(amount as f64, interest, new_tenure)?;
            session.tenure_months = Some(new_tenure);
            session.emi = Some(emi);
            session.state = ConversationState::Sales;
            debug!(amount, tenure = new_tenure, emi, "tenure updated");

            return Ok(format!(
                "Updated offer with your requested tenure:\n\
                 • Loan Amount: ₹{}\n\
                 • Tenure: {} months\n\
                 • Interest Rate: {:.1}% p.a.\n\
                 • Estimated EMI: ₹{} per month\n\n\
                 Reply OK to proceed to salary details,\n\
                 or adjust tenure/amount again.",
                format_inr(amount),
                new_tenure,
                interest,
                format_inr(emi)
            ));
        }

        // 3) EMI too high → one step up the relief ladder
        let complains_emi = EMI_TOO_HIGH_PHRASES.iter().any(|p| lower.contains(p))
            || (lower.contains("high") && lower.contains("emi"));
        if complains_emi {
            session.state = ConversationState::Sales;

            if tenure >= negotiation::MAX_TENURE_MONTHS {
                return Ok(format!(
                    "The tenure is already at the maximum I can offer ({} months).\n\
                     To reduce EMI further, you may need to lower the loan amount. \
                     Try typing a smaller amount, e.g. '200000'.",
                    negotiation::MAX_TENURE_MONTHS
                ));
            }

            let new_tenure =
                (tenure + negotiation::TENURE_RELIEF_STEP).min(negotiation::MAX_TENURE_MONTHS);
            let emi = calculate_emi(amount as f64, interest, new_tenure)?;
            session.tenure_months = Some(new_tenure);
            session.emi = Some(emi);
            debug!(amount, tenure = new_tenure, emi, "relief step applied");

            return Ok(format!(
                "Understood. I've increased the tenure to help reduce the EMI:\n\
                 • Loan Amount: ₹{}\n\
                 • New Tenure: {} months\n\
                 • Interest Rate: {:.1}% p.a.\n\
                 • New Estimated EMI: ₹{} per month\n\n\
                 If this is acceptable, reply OK to proceed.\n\
                 You can also specify an exact tenure, like '36 months'.",
                format_inr(amount),
                new_tenure,
                interest,
                format_inr(emi)
            ));
        }

        // 4) New amount
        if let Some(new_amount) = first_number(text) {
            if new_amount > 0 && new_amount != amount {
                let emi = calculate_emi(new_amount as f64, interest, tenure)?;
                session.loan_amount = Some(new_amount);
                session.emi = Some(emi);
                session.state = ConversationState::Sales;
                debug!(amount = new_amount, tenure, emi, "amount updated");

                return Ok(format!(
                    "Updated offer with your new requested amount:\n\
                     • Loan Amount: ₹{}\n\
                     • Tenure: {} months\n\
                     • Interest Rate: {:.1}% p.a.\n\
                     • Estimated EMI: ₹{} per month\n\n\
                     Reply OK to proceed to salary details, \
                     or adjust tenure/amount again.",
                    format_inr(new_amount),
                    tenure,
                    interest,
                    format_inr(emi)
                ));
            }
        }

        // 5) Fallback menu
        session.state = ConversationState::Sales;
        Ok("To refine the loan offer, you can:\n\
            \x20 - Change tenure: 'make it 36 months' or 'for 3 years'\n\
            \x20 - Change amount: 'try 250000'\n\
            \x20 - Or reply OK to proceed to salary details."
            .to_string())
    }

    /// First amount capture: seed the draft offer with defaults.
    fn seed_offer(&self, text: &str, session: &mut LoanSession) -> Result<String, AgentError> {
        let Some(amount) = first_number(text).filter(|a| *a > 0) else {
            return Ok("Please enter the loan amount you need, for example: 300000.".to_string());
        };

        let tenure = negotiation::DEFAULT_TENURE_MONTHS;
        let interest = negotiation::DEFAULT_INTEREST_RATE;
        let emi = calculate_emi(amount as f64, interest, tenure)?;

        session.loan_amount = Some(amount);
        session.tenure_months = Some(tenure);
        session.interest_rate = Some(interest);
        session.emi = Some(emi);
        session.state = ConversationState::Sales;
        debug!(amount, tenure, emi, "draft offer seeded");

        Ok(format!(
            "Here is a draft offer based on your requested amount:\n\
             • Loan Amount: ₹{}\n\
             • Tenure: {} months\n\
             • Interest Rate: {:.1}% p.a.\n\
             • Estimated EMI: ₹{} per month\n\n\
             You can adjust the tenure (12/24/36/48/60 months),\n\
             or just type a new amount like '250000'.\n\n\
             If you are happy with this offer, reply OK and we'll proceed to your salary details.",
            format_inr(amount),
            tenure,
            interest,
            format_inr(emi)
        ))
    }
}
