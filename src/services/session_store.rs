use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

/// Idle timeout applied when none is configured (2 hours).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

struct SessionRecord {
    user_id: i32,
    last_seen: Instant,
}

/// Explicit in-memory session table mapping opaque tokens to authenticated
/// user ids.
///
/// Two states per token: absent (anonymous) or present (authenticated).
/// Entries expire after an idle timeout, refreshed on every successful
/// resolve; an expired entry is observably identical to one that never
/// existed. Destroyed sessions are removed outright and can never resolve
/// again.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Record a login and hand back the server-generated opaque token.
    pub fn create(&self, user_id: i32) -> String {
        let session_id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        sessions.insert(
            session_id.clone(),
            SessionRecord {
                user_id,
                last_seen: Instant::now(),
            },
        );
        debug!(user_id, "created session");
        session_id
    }

    /// Resolve a token to its user id, touching the idle clock.
    /// Expired entries are removed and report None.
    pub fn resolve(&self, session_id: &str) -> Option<i32> {
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        match sessions.get_mut(session_id) {
            Some(record) if record.last_seen.elapsed() <= self.idle_timeout => {
                record.last_seen = Instant::now();
                Some(record.user_id)
            }
            Some(_) => {
                sessions.remove(session_id);
                None
            }
            None => None,
        }
    }

    /// Destroy a session entirely. Destroying an unknown token is a no-op.
    pub fn destroy(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        if sessions.remove(session_id).is_some() {
            debug!("destroyed session");
        }
    }

    /// Drop every entry past its idle timeout. Called opportunistically
    /// (at login); resolve already expires entries lazily.
    pub fn purge_expired(&self) {
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        sessions.retain(|_, record| record.last_seen.elapsed() <= self.idle_timeout);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}
