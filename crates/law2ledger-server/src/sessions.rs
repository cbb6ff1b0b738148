//! In-memory dashboard sessions
//!
//! Each browser session owns one [`Dashboard`]. Sessions expire after 30
//! minutes of inactivity and expired entries are swept whenever a new
//! session is created.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use law2ledger_core::Dashboard;

/// Session timeout (30 minutes of inactivity)
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct Session {
    last_activity: Instant,
    dashboard: Dashboard,
}

impl Session {
    fn new() -> Self {
        Self {
            last_activity: Instant::now(),
            dashboard: Dashboard::new(),
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    counter: AtomicU64,
    timeout: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_timeout(SESSION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
            timeout,
        }
    }

    /// Create a new session and return its ID
    pub async fn create(&self) -> String {
        // Timestamp plus a process-wide counter keeps IDs unique within a tick
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        hasher.update(seq.to_le_bytes());
        let session_id = format!("l2l_{}", &hex::encode(hasher.finalize())[..16]);

        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.timeout));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!(swept, "Expired sessions removed");
        }

        sessions.insert(session_id.clone(), Session::new());
        session_id
    }

    /// Whether a live session exists
    pub async fn exists(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .is_some_and(|s| !s.is_expired(self.timeout))
    }

    /// Run `f` against a session's dashboard under the write lock.
    ///
    /// Returns `None` when the session is missing or expired.
    pub async fn update<R>(&self, session_id: &str, f: impl FnOnce(&mut Dashboard) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .filter(|s| !s.is_expired(self.timeout))?;
        session.touch();
        Some(f(&mut session.dashboard))
    }

    /// Run `f` against a session's dashboard under the read lock
    pub async fn read<R>(&self, session_id: &str, f: impl FnOnce(&Dashboard) -> R) -> Option<R> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|s| !s.is_expired(self.timeout))
            .map(|s| f(&s.dashboard))
    }

    /// Number of stored sessions, including any not yet swept
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use law2ledger_core::View;

    #[tokio::test]
    async fn test_create_unique_ids() {
        let manager = SessionManager::new();
        let a = manager.create().await;
        let b = manager.create().await;

        assert_ne!(a, b);
        assert!(a.starts_with("l2l_"));
        assert_eq!(a.len(), 20);
        assert!(manager.exists(&a).await);
        assert_eq!(manager.count().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let manager = SessionManager::new();
        assert!(!manager.exists("l2l_missing").await);
        assert!(manager.read("l2l_missing", |d| d.view()).await.is_none());
        assert!(manager.update("l2l_missing", |d| d.view()).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_swept_on_create() {
        let manager = SessionManager::with_timeout(Duration::ZERO);
        let old = manager.create().await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(!manager.exists(&old).await);
        manager.create().await;
        assert_eq!(manager.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_mutates_dashboard() {
        let manager = SessionManager::new();
        let id = manager.create().await;

        let result = manager
            .update(&id, |d| d.select(View::Visual))
            .await
            .unwrap();
        assert!(result.is_err());
        assert_eq!(manager.read(&id, |d| d.view()).await, Some(View::Profile));
    }
}
