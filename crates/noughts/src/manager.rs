//! Registry of concurrent game sessions.

use crate::config::SessionConfig;
use crate::handle::SessionHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Session registry error.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// A session with this ID is already registered.
    #[display("Session {} already exists", _0)]
    AlreadyExists(SessionId),
    /// No session with this ID is registered.
    #[display("Session {} not found", _0)]
    NotFound(SessionId),
}

impl std::error::Error for SessionError {}

/// Manages all game sessions.
///
/// Sessions share nothing: each has its own history, generator and
/// pending computer move.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SessionHandle>>>,
    defaults: SessionConfig,
}

impl SessionManager {
    /// Creates a session manager whose sessions start from `defaults`.
    #[instrument(skip(defaults))]
    pub fn new(defaults: SessionConfig) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            defaults,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a new game session, using the manager defaults if `config`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyExists`] if `id` is taken.
    #[instrument(skip(self, config))]
    pub fn create_session(
        &self,
        id: &str,
        config: Option<SessionConfig>,
    ) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.lock();

        if sessions.contains_key(id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id.to_string()));
        }

        let handle = SessionHandle::new(config.as_ref().unwrap_or(&self.defaults));
        sessions.insert(id.to_string(), handle.clone());
        info!(session_id = %id, "Created new session");
        Ok(handle)
    }

    /// Gets a session by ID.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<SessionHandle> {
        let session = self.lock().get(id).cloned();
        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }
        session
    }

    /// Removes a session and cancels its pending computer move.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if no session has this ID.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<(), SessionError> {
        let handle = self
            .lock()
            .remove(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        handle.shutdown();
        info!(session_id = id, "Removed session");
        Ok(())
    }

    /// Lists all active session IDs in sorted order.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
