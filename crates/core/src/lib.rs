//! Core types for the digital loan officer
//!
//! This crate provides the foundational types shared by every other
//! crate:
//! - The conversation state enum that drives all dialogue branching
//! - The per-applicant session record
//! - Currency formatting for replies and documents

pub mod money;
pub mod session;

pub use money::format_inr;
pub use session::{ConversationState, LoanSession};
