pub mod health;
pub mod sessions;
pub mod training;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /systems                                 list systems
/// /systems/{id}/untrained-employees        employees without an assignment
/// /systems/{id}/assignments                register employees (POST)
/// /assignments                             paginated assignment list
/// /summary                                 summary counters
///
/// /sessions                                start a session (POST)
/// /sessions/{id}                           render view, end session (DELETE)
/// /sessions/{id}/actions                   dispatch one action (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/systems", training::systems_router())
        .nest("/assignments", training::assignments_router())
        .merge(training::summary_router())
        .nest("/sessions", sessions::router())
}
