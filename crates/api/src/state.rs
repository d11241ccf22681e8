use std::sync::Arc;

use trainreg_core::training::TrainingStore;
use trainreg_db::PgTrainingStore;

use crate::config::ServerConfig;
use crate::sessions::SessionManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: trainreg_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Data access used by session contexts.
    pub store: Arc<dyn TrainingStore>,
    /// Live session contexts.
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Wire the store and session manager around `pool`.
    pub fn new(pool: trainreg_db::DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(PgTrainingStore::new(pool.clone()));
        let sessions = Arc::new(SessionManager::new(
            config.cache,
            config.session_idle_timeout,
        ));
        Self {
            pool,
            config: Arc::new(config),
            store,
            sessions,
        }
    }
}
