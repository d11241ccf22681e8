use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Number of live sessions.
    pub sessions: usize,
    /// Session and cache timings in effect.
    pub settings: SettingsSummary,
}

/// Timing settings loaded at startup, in seconds.
#[derive(Serialize)]
pub struct SettingsSummary {
    pub session_idle_secs: u64,
    pub cache_assignments_secs: u64,
    pub cache_systems_secs: u64,
    pub cache_untrained_secs: u64,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = trainreg_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        sessions: state.sessions.session_count().await,
        settings: SettingsSummary {
            session_idle_secs: state.config.session_idle_timeout.as_secs(),
            cache_assignments_secs: state.config.cache.assignments.as_secs(),
            cache_systems_secs: state.config.cache.systems.as_secs(),
            cache_untrained_secs: state.config.cache.untrained.as_secs(),
        },
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
