//! Session Management
//!
//! Sessions live in memory for the lifetime of the process. Each one
//! wraps its `LoanSession` record in a tokio mutex so chat turns and
//! uploads for the same session are serialized: there is exactly one
//! writer per session id at a time, and concurrent requests queue.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use loan_officer_core::LoanSession;

use crate::ServerError;

/// One applicant's session
pub struct Session {
    /// Session ID
    pub id: String,
    /// The conversation record; the mutex serializes turns
    pub conversation: tokio::sync::Mutex<LoanSession>,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    pub last_activity: RwLock<Instant>,
    /// Is active
    pub active: RwLock<bool>,
}

impl Session {
    /// Create a new session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conversation: tokio::sync::Mutex::new(LoanSession::new()),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Close session
    pub fn close(&self) {
        *self.active.write() = false;
    }

    /// Is session active
    pub fn is_active(&self) -> bool {
        *self.active.read()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Create a new session manager with default timeouts
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout: Duration::from_secs(3600), // 1 hour
            cleanup_interval: Duration::from_secs(300), // 5 minutes
        }
    }

    /// Create a new session manager with custom timeout and cleanup interval
    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Returns a shutdown sender that stops the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                "Session cleanup: removed {} expired sessions ({} remaining)",
                                before - after,
                                after
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session
    pub fn create(&self) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            // Try to reclaim capacity from expired sessions first
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Session("Max sessions reached".to_string()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id));
        sessions.insert(id.clone(), session.clone());

        tracing::info!(session_id = %id, "Created session");

        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        let sessions = self.sessions.read();
        sessions.get(id).cloned()
    }

    /// Remove a session
    pub fn remove(&self, id: &str) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.remove(id) {
            session.close();
            tracing::info!("Removed session: {}", id);
        }
    }

    /// Get active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Cleanup expired sessions
    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            if let Some(session) = sessions.remove(&id) {
                session.close();
                tracing::info!("Expired session: {}", id);
            }
        }
    }

    /// List all session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_officer_core::ConversationState;

    #[test]
    fn test_session_creation() {
        let manager = SessionManager::new(10);
        let session = manager.create().unwrap();

        assert!(session.is_active());
        assert!(!session.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_session_get() {
        let manager = SessionManager::new(10);
        let session = manager.create().unwrap();
        let id = session.id.clone();

        let retrieved = manager.get(&id);
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().id, id);
    }

    #[test]
    fn test_session_remove() {
        let manager = SessionManager::new(10);
        let session = manager.create().unwrap();
        let id = session.id.clone();

        manager.remove(&id);
        assert!(manager.get(&id).is_none());
    }

    #[test]
    fn test_capacity_cap() {
        let manager = SessionManager::new(2);
        manager.create().unwrap();
        manager.create().unwrap();

        assert!(manager.create().is_err());
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_expired_sessions_reclaimed_at_capacity() {
        let manager =
            SessionManager::with_config(1, Duration::from_secs(0), Duration::from_secs(300));
        let first = manager.create().unwrap();
        let first_id = first.id.clone();

        // Zero timeout: the first session is already expired, so the
        // next create evicts it instead of failing
        std::thread::sleep(Duration::from_millis(5));
        let second = manager.create().unwrap();

        assert_ne!(second.id, first_id);
        assert!(manager.get(&first_id).is_none());
    }

    #[tokio::test]
    async fn test_conversation_starts_fresh() {
        let manager = SessionManager::new(10);
        let session = manager.create().unwrap();

        let conversation = session.conversation.lock().await;
        assert_eq!(conversation.state, ConversationState::Init);
        assert!(conversation.name.is_none());
    }
}
