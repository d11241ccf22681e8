//! Handlers for interactive sessions.
//!
//! Each session owns a [`SessionContext`](trainreg_core::session::SessionContext).
//! Every request either renders the current view or dispatches one action
//! and renders the result.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use trainreg_core::session::{SessionAction, SessionView};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::sessions::SharedSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub view: SessionView,
}

/// POST /api/v1/sessions
///
/// Start a session and return its first view.
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let today = chrono::Local::now().date_naive();
    let (session_id, session) = state.sessions.create(today).await;

    let view = session
        .lock()
        .await
        .render(state.store.as_ref(), Instant::now())
        .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionCreated { session_id, view },
        }),
    ))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, session_id).await?;

    let view = session
        .lock()
        .await
        .render(state.store.as_ref(), Instant::now())
        .await;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/sessions/{id}/actions
///
/// Apply one action. Failures inside the action surface as notifications in
/// the returned view, not as HTTP errors.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(action): Json<SessionAction>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, session_id).await?;

    tracing::debug!(session_id = %session_id, ?action, "Dispatching session action");
    let view = session
        .lock()
        .await
        .dispatch(action, state.store.as_ref())
        .await;

    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/sessions/{id}
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.sessions.remove(session_id).await {
        return Err(AppError::SessionNotFound(session_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn find_session(state: &AppState, session_id: Uuid) -> AppResult<SharedSession> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or(AppError::SessionNotFound(session_id))
}
