//! Configuration management for the loan officer
//!
//! Supports loading configuration from:
//! - YAML/TOML files (config/default, config/{env})
//! - Environment variables (LOAN_OFFICER_ prefix)
//!
//! Policy and negotiation numbers live in [`constants`]; everything an
//! operator may want to override per deployment lives in
//! [`settings::Settings`].

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, DocumentConfig, ObservabilityConfig, RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
