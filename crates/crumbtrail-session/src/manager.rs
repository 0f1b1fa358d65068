//! Session Manager
//!
//! Process-wide registry of live sessions. Ending a session drops its trail.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SessionError;
use crate::session::{Session, SessionContext};
use crate::Result;

pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session with a fresh id
    pub fn create_session(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        self.sessions
            .write()
            .insert(session.id().to_string(), Arc::clone(&session));

        tracing::info!(session_id = %session.id(), "Created new session");

        session
    }

    /// Look up a session by the id the host tracks, creating it if needed
    pub fn get_or_create_session(&self, session_id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.read().get(session_id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write();
        let session = sessions.entry(session_id.to_string()).or_insert_with(|| {
            tracing::info!(session_id = %session_id, "Created new session");
            Arc::new(Session::with_id(session_id))
        });
        Arc::clone(session)
    }

    pub fn get_session(&self, session_id: &str) -> Result<Arc<Session>> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// End a session, releasing everything stored in it
    pub fn end_session(&self, session_id: &str) -> Result<()> {
        let session = self
            .sessions
            .write()
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        // Requests still holding the Arc must not see stale state
        session.clear();

        tracing::info!(session_id = %session_id, "Ended session");

        Ok(())
    }

    pub fn list_sessions(&self) -> Vec<Arc<Session>> {
        self.sessions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}
