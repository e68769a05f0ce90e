//! Dialogue state machine and negotiation engine
//!
//! One free-text turn goes in, one reply comes out, and the session is
//! mutated in place. The engine is fully synchronous; the transport
//! layer owns concurrency and serializes turns per session.
//!
//! - [`extract`] — slot extraction from free text (numbers, tenure)
//! - [`negotiation`] — the EMI negotiation loop
//! - [`underwrite`] — adapts eligibility decisions into replies
//! - [`dialogue`] — the per-state turn dispatcher

pub mod dialogue;
pub mod extract;
pub mod negotiation;
pub mod underwrite;

pub use dialogue::DialogueEngine;
pub use negotiation::Negotiator;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Underwriting(#[from] loan_officer_underwriting::UnderwritingError),
}
