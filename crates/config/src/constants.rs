//! Centralized constants for the loan officer
//!
//! Single source of truth for the business numbers used across the
//! codebase. The dialogue, negotiation, and underwriting crates all
//! read from here instead of hardcoding values locally.

/// Draft-offer defaults and the negotiation relief ladder
pub mod negotiation {
    /// Tenure proposed with the first draft offer (months)
    pub const DEFAULT_TENURE_MONTHS: u32 = 24;

    /// Annual interest rate for personal loans (percent)
    ///
    /// Fixed for the life of an offer; rate negotiation is not part of
    /// the product today.
    pub const DEFAULT_INTEREST_RATE: f64 = 14.0;

    /// Longest tenure the relief ladder may reach (months)
    pub const MAX_TENURE_MONTHS: u32 = 60;

    /// Tenure added per "EMI too high" complaint (months)
    pub const TENURE_RELIEF_STEP: u32 = 12;
}

/// Underwriting policy thresholds
pub mod policy {
    /// Minimum monthly net salary (INR)
    pub const MIN_INCOME: i64 = 25_000;

    /// Minimum acceptable derived credit score
    pub const MIN_CREDIT_SCORE: u16 = 680;

    /// Maximum EMI-to-income ratio (45%)
    pub const MAX_DTI: f64 = 0.45;

    /// Loan cap as a multiple of annual income
    pub const MAX_LOAN_INCOME_MULTIPLE: i64 = 4;
}

/// Synthetic credit score parameters
pub mod credit_score {
    /// Score floor before the salary bump
    pub const BASE: u16 = 620;

    /// Score added per ₹1,000 of monthly salary
    pub const BUMP_PER_THOUSAND: f64 = 2.0;

    /// Hard cap on the derived score
    pub const CAP: u16 = 800;
}

/// Salary-slip verification defaults
pub mod documents {
    /// Demo-safe monthly salary used when the slip yields nothing usable
    pub const FALLBACK_SALARY: i64 = 45_000;

    /// Lowest verified figure accepted as-is from a slip
    pub const MIN_PLAUSIBLE_SALARY: i64 = 20_000;

    /// Highest verified figure accepted as-is from a slip
    pub const MAX_PLAUSIBLE_SALARY: i64 = 200_000;

    /// Upload body cap (bytes)
    pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;
}
