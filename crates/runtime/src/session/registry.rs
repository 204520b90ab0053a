use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use combat_core::PlayerId;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use super::state::SessionState;

/// Session identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// One party's lifecycle object.
pub struct Session {
    id: SessionId,
    key: String,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// External channel or thread key this session was opened for.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Resolves sessions by id or external key.
///
/// The maps are only held for lookups, never across an await.
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    keys: RwLock<HashMap<String, SessionId>>,
    log_capacity: usize,
}

impl SessionRegistry {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            sessions: RwLock::new(HashMap::new()),
            keys: RwLock::new(HashMap::new()),
            log_capacity,
        }
    }

    /// Opens a session for `key`, or returns the one already open for it.
    pub fn open(&self, key: impl Into<String>, players: Vec<PlayerId>) -> Arc<Session> {
        let key = key.into();
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = keys.get(&key).and_then(|id| sessions.get(id)) {
            return Arc::clone(existing);
        }

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(Session {
            id,
            key: key.clone(),
            state: Mutex::new(SessionState::new(players, self.log_capacity)),
        });
        keys.insert(key, id);
        sessions.insert(id, Arc::clone(&session));
        tracing::debug!(target: "combat::orchestrator", session = %id, "session opened");
        session
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn by_key(&self, key: &str) -> Option<Arc<Session>> {
        let id = *self
            .keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)?;
        self.get(id)
    }

    /// Forgets the session. Battle cleanup is the orchestrator's job.
    pub fn close(&self, id: SessionId) -> Option<Arc<Session>> {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)?;
        keys.remove(removed.key());
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_is_idempotent_per_key() {
        let registry = SessionRegistry::new(10);
        let a = registry.open("thread-1", vec![PlayerId(1), PlayerId(2)]);
        let again = registry.open("thread-1", vec![PlayerId(3)]);
        assert_eq!(a.id(), again.id());
        assert_eq!(registry.len(), 1);

        let state = a.lock().await;
        assert_eq!(state.players, vec![PlayerId(1), PlayerId(2)]);
        assert_eq!(state.current, Some(PlayerId(1)));
    }

    #[test]
    fn lookup_by_key_and_close() {
        let registry = SessionRegistry::new(10);
        let a = registry.open("thread-1", vec![PlayerId(1)]);
        let b = registry.open("thread-2", vec![PlayerId(2)]);
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.by_key("thread-2").map(|s| s.id()), Some(b.id()));

        assert!(registry.close(a.id()).is_some());
        assert!(registry.close(a.id()).is_none());
        assert!(registry.by_key("thread-1").is_none());
        assert!(registry.get(b.id()).is_some());
    }
}
