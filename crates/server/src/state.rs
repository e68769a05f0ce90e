//! Application State
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use loan_officer_agent::DialogueEngine;
use loan_officer_config::{load_settings, Settings};
use loan_officer_documents::SanctionRenderer;

use crate::session::SessionManager;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration wrapped in RwLock for hot-reload support
    pub config: Arc<RwLock<Settings>>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Dialogue engine (stateless; sessions carry all state)
    pub engine: Arc<DialogueEngine>,
    /// Sanction letter renderer
    pub renderer: Arc<SanctionRenderer>,
    /// Environment name for config reload
    env: Option<String>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        Self::with_env(config, None)
    }

    /// Create new application state with environment name for reload support
    pub fn with_env(config: Settings, env: Option<String>) -> Result<Self, ServerError> {
        let sessions = Arc::new(SessionManager::with_config(
            config.server.max_sessions,
            Duration::from_secs(config.server.session_timeout_seconds),
            Duration::from_secs(300),
        ));

        let renderer = SanctionRenderer::new(config.documents.wkhtmltopdf_path.clone())
            .map_err(|e| ServerError::Internal(format!("Renderer init failed: {e}")))?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            sessions,
            engine: Arc::new(DialogueEngine::new()),
            renderer: Arc::new(renderer),
            env,
        })
    }

    /// Reload configuration from files
    pub fn reload_config(&self) -> Result<(), String> {
        let new_config = load_settings(self.env.as_deref())
            .map_err(|e| format!("Failed to reload config: {}", e))?;

        let mut config = self.config.write();
        *config = new_config;

        tracing::info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }
}
