use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use trainreg_core::cache::CacheWindows;
use trainreg_core::session::SessionContext;
use trainreg_core::types::TrainingDate;
use uuid::Uuid;

/// A session context shared between the manager and the request holding it.
///
/// The mutex serializes actions: one request per session is applied at a time.
pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Bookkeeping for a single live session.
struct SessionEntry {
    session: SharedSession,
    /// Last time the session was created or looked up.
    last_access: Instant,
}

/// Owns every live session context, keyed by session id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Sessions live in memory only and are
/// discarded when ended, when idle longer than `idle_timeout`, or when the
/// process stops. Idle sessions are dropped lazily on the next `create` or
/// `get`; there is no background sweep.
pub struct SessionManager {
    windows: CacheWindows,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionManager {
    /// Create an empty manager whose sessions cache reads for `windows` and
    /// expire after `idle_timeout` without a lookup.
    pub fn new(windows: CacheWindows, idle_timeout: Duration) -> Self {
        Self {
            windows,
            idle_timeout,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session whose training date defaults to `today`.
    pub async fn create(&self, today: TrainingDate) -> (Uuid, SharedSession) {
        self.create_at(today, Instant::now()).await
    }

    /// [`create`](Self::create) with an explicit clock reading.
    pub async fn create_at(&self, today: TrainingDate, now: Instant) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(SessionContext::new(self.windows, today)));

        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions, now);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                last_access: now,
            },
        );
        drop(sessions);

        tracing::info!(session_id = %id, "Session started");
        (id, session)
    }

    /// Look up a live session and refresh its idle clock.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.get_at(id, Instant::now()).await
    }

    /// [`get`](Self::get) with an explicit clock reading.
    pub async fn get_at(&self, id: Uuid, now: Instant) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions, now);
        sessions.get_mut(&id).map(|entry| {
            entry.last_access = now;
            Arc::clone(&entry.session)
        })
    }

    /// End a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Return the current number of sessions held, including idle ones not
    /// yet pruned.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Discard every session. Used during graceful shutdown.
    pub async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        count
    }

    fn prune(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.saturating_duration_since(entry.last_access) < self.idle_timeout
        });
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, "Discarded idle sessions");
        }
    }
}
