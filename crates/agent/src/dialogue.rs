//! Per-state turn dispatcher
//!
//! One `handle_turn` call per chat message. The global menu reset is
//! checked before any state logic, so "menu" works from every state,
//! including the terminal ones. Everything else is an exhaustive match
//! over the conversation state.

use tracing::{debug, info};

use loan_officer_core::{format_inr, ConversationState, LoanSession};

use crate::extract::digits_only;
use crate::negotiation::Negotiator;
use crate::{underwrite, AgentError};

const RESET_KEYWORDS: &[&str] = &["menu", "main menu", "restart", "start over"];

/// The dialogue engine: interprets one turn against the session state
#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    negotiator: Negotiator,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self {
            negotiator: Negotiator::new(),
        }
    }

    /// Handle one chat turn, mutating the session in place.
    pub fn handle_turn(
        &self,
        message: &str,
        session: &mut LoanSession,
    ) -> Result<String, AgentError> {
        let text = message.trim();
        let lower = text.to_lowercase();

        // Global menu reset wins over everything, from any state
        if RESET_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            info!(from_state = %session.state, "session reset to main menu");
            session.reset_to_name();
            return Ok("You have returned to the main menu.\n\
                       Hi again, I'm your Digital Loan Officer.\n\
                       Let's start fresh.\n\n\
                       What is your full name?"
                .to_string());
        }

        debug!(state = %session.state, "handling turn");

        match session.state {
            ConversationState::Init => {
                session.state = ConversationState::AskName;
                Ok("Hi, I'm your Digital Loan Officer.\n\
                    To begin, may I know your full name?"
                    .to_string())
            }

            ConversationState::AskName => {
                if text.is_empty() {
                    return Ok("Please share your full name to proceed.".to_string());
                }

                session.name = Some(text.to_string());
                session.state = ConversationState::AskPhone;
                Ok(format!(
                    "Thanks, {text}.\nPlease share your 10-digit mobile number."
                ))
            }

            ConversationState::AskPhone => {
                let digits = digits_only(text);
                if digits.len() < 10 {
                    return Ok(
                        "Please enter a valid 10-digit mobile number (digits only).".to_string()
                    );
                }

                session.phone = Some(digits);
                session.state = ConversationState::AskLoanAmount;
                Ok("Noted.\nHow much personal loan do you need? (e.g. 300000)".to_string())
            }

            ConversationState::AskLoanAmount | ConversationState::Sales => {
                self.negotiator.negotiate(text, session)
            }

            ConversationState::AskSalary => {
                let salary = digits_only(text).parse::<i64>().ok();
                let Some(salary) = salary.filter(|s| *s > 0) else {
                    return Ok("Please enter your approximate monthly net salary in ₹, \
                               for example: 45000."
                        .to_string());
                };

                session.salary = Some(salary);
                session.state = ConversationState::AskPan;
                Ok(format!(
                    "Thanks. I have noted your monthly income as ₹{}.\n\
                     Now, please enter your PAN (dummy is fine for this demo).",
                    format_inr(salary)
                ))
            }

            ConversationState::AskPan => {
                // Stored verbatim (spaces stripped), no format check:
                // a dummy PAN is acceptable here
                let pan: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                session.pan = Some(pan);
                session.state = ConversationState::WaitUpload;
                Ok("PAN captured.\n\
                    Now please upload your latest salary slip (PDF or image) \
                    using the upload option.\n\n\
                    You can type 'menu' anytime to restart."
                    .to_string())
            }

            ConversationState::WaitUpload => Ok(
                "Please upload your salary slip to run the eligibility check.".to_string(),
            ),

            // Administrative path: only reachable when the state was set
            // out-of-band
            ConversationState::Underwrite => Ok(underwrite::evaluate(session)),

            ConversationState::Approved => Ok("Your loan is approved.\n\
                 You can now download your sanction letter."
                .to_string()),

            ConversationState::Rejected => {
                Ok("Your profile was not approved for the requested loan.\n\
                    You may try a lower loan amount or a longer tenure, \
                    or type 'menu' to restart."
                    .to_string())
            }
        }
    }

    /// Complete a salary-slip upload: the verified figure supersedes
    /// whatever was typed in chat, and underwriting runs immediately.
    pub fn complete_document_upload(
        &self,
        verified_salary: i64,
        session: &mut LoanSession,
    ) -> String {
        let previously_declared = session.salary;
        session.salary = Some(verified_salary);

        let decision_reply = underwrite::evaluate(session);

        let mut lines = vec![
            "Salary slip received.".to_string(),
            format!(
                "Verified monthly income from salary slip: ₹{}.",
                format_inr(verified_salary)
            ),
        ];

        if let Some(declared) = previously_declared {
            if declared != verified_salary {
                lines.push(format!(
                    "(Previously declared in chat: ₹{}.)",
                    format_inr(declared)
                ));
            }
        }

        lines.push(String::new());
        lines.push(decision_reply);
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(engine: &DialogueEngine, session: &mut LoanSession, message: &str) -> String {
        engine.handle_turn(message, session).unwrap()
    }

    #[test]
    fn test_happy_path_to_approval() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        let reply = turn(&engine, &mut session, "hi");
        assert!(reply.contains("may I know your full name"));
        assert_eq!(session.state, ConversationState::AskName);

        let reply = turn(&engine, &mut session, "Asha Verma");
        assert!(reply.contains("Thanks, Asha Verma"));

        let reply = turn(&engine, &mut session, "9876543210");
        assert!(reply.contains("How much personal loan"));
        assert_eq!(session.phone.as_deref(), Some("9876543210"));

        let reply = turn(&engine, &mut session, "300000");
        assert!(reply.contains("draft offer"));
        assert_eq!(session.state, ConversationState::Sales);

        let reply = turn(&engine, &mut session, "ok");
        assert!(reply.contains("monthly net salary"));
        assert_eq!(session.state, ConversationState::AskSalary);

        let reply = turn(&engine, &mut session, "50000");
        assert!(reply.contains("50,000"));
        assert_eq!(session.state, ConversationState::AskPan);

        let reply = turn(&engine, &mut session, "ABCDE 1234 F");
        assert!(reply.contains("PAN captured"));
        assert_eq!(session.pan.as_deref(), Some("ABCDE1234F"));
        assert_eq!(session.state, ConversationState::WaitUpload);

        // Upload a slip that verifies the declared salary
        let reply = engine.complete_document_upload(50_000, &mut session);
        assert!(reply.contains("Salary slip received."));
        assert!(reply.contains("eligible for this loan"));
        assert!(!reply.contains("Previously declared"));
        assert_eq!(session.state, ConversationState::Approved);
        assert_eq!(session.credit_score, Some(720));
    }

    #[test]
    fn test_low_income_path_rejected() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hello");
        turn(&engine, &mut session, "Ravi");
        turn(&engine, &mut session, "9000000001");
        turn(&engine, &mut session, "300000");
        turn(&engine, &mut session, "ok");
        turn(&engine, &mut session, "20000");
        turn(&engine, &mut session, "XYZAB9999X");

        let reply = engine.complete_document_upload(20_000, &mut session);
        assert!(reply.contains("below the minimum required"));
        assert_eq!(session.state, ConversationState::Rejected);
    }

    #[test]
    fn test_upload_supersedes_declared_salary() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        turn(&engine, &mut session, "Asha");
        turn(&engine, &mut session, "9876543210");
        turn(&engine, &mut session, "300000");
        turn(&engine, &mut session, "ok");
        turn(&engine, &mut session, "60000");
        turn(&engine, &mut session, "ABCDE1234F");

        let reply = engine.complete_document_upload(45_000, &mut session);

        assert_eq!(session.salary, Some(45_000));
        assert!(reply.contains("Verified monthly income from salary slip: ₹45,000."));
        assert!(reply.contains("(Previously declared in chat: ₹60,000.)"));
    }

    #[test]
    fn test_menu_resets_from_any_state() {
        let engine = DialogueEngine::new();

        for state in [
            ConversationState::AskPhone,
            ConversationState::Sales,
            ConversationState::WaitUpload,
            ConversationState::Approved,
            ConversationState::Rejected,
        ] {
            let mut session = LoanSession {
                state,
                name: Some("Asha".into()),
                salary: Some(50_000),
                ..LoanSession::default()
            };

            let reply = turn(&engine, &mut session, "main menu");

            assert!(reply.contains("start fresh"));
            assert_eq!(session.state, ConversationState::AskName);
            assert!(session.name.is_none());
            assert!(session.salary.is_none());
        }
    }

    #[test]
    fn test_reset_wins_over_negotiation() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        turn(&engine, &mut session, "Asha");
        turn(&engine, &mut session, "9876543210");
        turn(&engine, &mut session, "300000");

        // "restart" contains no digits, but even "restart with 500000"
        // must reset, not edit the amount
        turn(&engine, &mut session, "restart with 500000");
        assert_eq!(session.state, ConversationState::AskName);
        assert!(session.loan_amount.is_none());
    }

    #[test]
    fn test_phone_validation() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        turn(&engine, &mut session, "Asha");

        let reply = turn(&engine, &mut session, "12345");
        assert!(reply.contains("valid 10-digit"));
        assert_eq!(session.state, ConversationState::AskPhone);

        turn(&engine, &mut session, "98-765 43210");
        assert_eq!(session.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_empty_name_reprompts() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        let reply = turn(&engine, &mut session, "   ");

        assert!(reply.contains("full name"));
        assert_eq!(session.state, ConversationState::AskName);
        assert!(session.name.is_none());
    }

    #[test]
    fn test_pan_stored_verbatim_without_validation() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        turn(&engine, &mut session, "Asha");
        turn(&engine, &mut session, "9876543210");
        turn(&engine, &mut session, "300000");
        turn(&engine, &mut session, "ok");
        turn(&engine, &mut session, "50000");

        // Anything goes, even empty input: the state still advances
        let reply = turn(&engine, &mut session, "   ");
        assert!(reply.contains("PAN captured"));
        assert_eq!(session.pan.as_deref(), Some(""));
        assert_eq!(session.state, ConversationState::WaitUpload);
    }

    #[test]
    fn test_salary_reprompt_on_nonsense() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        turn(&engine, &mut session, "Asha");
        turn(&engine, &mut session, "9876543210");
        turn(&engine, &mut session, "300000");
        turn(&engine, &mut session, "ok");

        let reply = turn(&engine, &mut session, "a decent amount");
        assert!(reply.contains("for example: 45000"));
        assert_eq!(session.state, ConversationState::AskSalary);
    }

    #[test]
    fn test_terminal_states_answer_chat() {
        let engine = DialogueEngine::new();

        let mut session = LoanSession {
            state: ConversationState::Approved,
            ..LoanSession::default()
        };
        let reply = turn(&engine, &mut session, "what now?");
        assert!(reply.contains("download your sanction letter"));

        let mut session = LoanSession {
            state: ConversationState::Rejected,
            ..LoanSession::default()
        };
        let reply = turn(&engine, &mut session, "what now?");
        assert!(reply.contains("not approved"));
    }

    #[test]
    fn test_wait_upload_reminder() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession {
            state: ConversationState::WaitUpload,
            ..LoanSession::default()
        };

        let reply = turn(&engine, &mut session, "done?");
        assert!(reply.contains("upload your salary slip"));
        assert_eq!(session.state, ConversationState::WaitUpload);
    }

    #[test]
    fn test_underwrite_state_guards_missing_facts() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession {
            state: ConversationState::Underwrite,
            ..LoanSession::default()
        };

        let reply = turn(&engine, &mut session, "go");
        assert_eq!(reply, underwrite::MISSING_DETAILS);
    }

    #[test]
    fn test_upload_is_idempotent_after_decision() {
        let engine = DialogueEngine::new();
        let mut session = LoanSession::new();

        turn(&engine, &mut session, "hi");
        turn(&engine, &mut session, "Asha");
        turn(&engine, &mut session, "9876543210");
        turn(&engine, &mut session, "300000");
        turn(&engine, &mut session, "ok");
        turn(&engine, &mut session, "50000");
        turn(&engine, &mut session, "ABCDE1234F");

        engine.complete_document_upload(50_000, &mut session);
        let reply = engine.complete_document_upload(70_000, &mut session);

        assert!(reply.contains(underwrite::ALREADY_DECIDED));
        assert_eq!(session.state, ConversationState::Approved);
    }
}
