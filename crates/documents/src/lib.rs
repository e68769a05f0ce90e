//! Document handling for the digital loan officer
//!
//! - [`salary_slip`] — best-effort salary extraction from uploaded
//!   slips, with a demo-safe fallback
//! - [`sanction`] — sanction letter rendering (HTML template, PDF via
//!   wkhtmltopdf when available)

pub mod salary_slip;
pub mod sanction;

pub use salary_slip::verified_monthly_salary;
pub use sanction::{DocumentResult, SanctionRenderer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("template error: {0}")]
    Template(String),

    #[error("PDF conversion error: {0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
