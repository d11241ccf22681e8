//! Route definitions for interactive sessions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST   /              -> create_session
/// GET    /{id}          -> get_session
/// DELETE /{id}          -> end_session
/// POST   /{id}/actions  -> dispatch_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::create_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::end_session),
        )
        .route("/{id}/actions", post(sessions::dispatch_action))
}
