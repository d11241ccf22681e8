//! Route definitions for the stateless training catalogue.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::training;
use crate::state::AppState;

/// Routes mounted at `/systems`.
///
/// ```text
/// GET    /                          -> list_systems
/// GET    /{id}/untrained-employees  -> list_untrained_employees
/// POST   /{id}/assignments          -> register_assignments
/// ```
pub fn systems_router() -> Router<AppState> {
    Router::new()
        .route("/", get(training::list_systems))
        .route(
            "/{id}/untrained-employees",
            get(training::list_untrained_employees),
        )
        .route("/{id}/assignments", post(training::register_assignments))
}

/// Routes mounted at `/assignments`.
///
/// ```text
/// GET    /                          -> list_assignments
/// ```
pub fn assignments_router() -> Router<AppState> {
    Router::new().route("/", get(training::list_assignments))
}

pub fn summary_router() -> Router<AppState> {
    Router::new().route("/summary", get(training::get_summary))
}
