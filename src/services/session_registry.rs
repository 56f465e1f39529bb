//! Keyed, get-or-create registry of per-session mutable state.
//!
//! Each session id owns its own serialization unit: the registry hands out
//! `Arc<Mutex<SessionState>>` handles, and the outer map lock is held only
//! long enough to look up or insert a handle. Operations on different
//! sessions never serialize against each other.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::models::SessionState;

/// Shared handle to one session's state.
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Concurrency-safe store of per-session assessment state.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `session_id`, creating zero-valued state for an
    /// unseen id. Creation is atomic: racing callers converge on one entry.
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(session_id) {
                return Arc::clone(handle);
            }
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock: another task may have won the race.
        Arc::clone(sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id, "creating session state");
            Arc::new(Mutex::new(SessionState::new(session_id)))
        }))
    }

    /// Returns the handle only if the session already exists.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(session_id).map(Arc::clone)
    }

    /// Replaces the stored state for `session_id`.
    pub async fn put(&self, session_id: &str, state: SessionState) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), Arc::new(Mutex::new(state)));
    }

    /// Deletes the session; a later access starts from zero-valued state.
    /// Returns whether an entry was removed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Session ids untouched since before `cutoff`. A session whose lock is
    /// currently held is in active use and is skipped.
    pub async fn idle_since(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        let sessions = self.sessions.read().await;
        let mut idle = Vec::new();
        for (id, handle) in sessions.iter() {
            if let Ok(state) = handle.try_lock() {
                if state.touched_at < cutoff {
                    idle.push(id.clone());
                }
            }
        }
        idle
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
