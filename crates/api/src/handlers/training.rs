//! Handlers for the stateless training catalogue.
//!
//! These endpoints go through the shared [`TrainingStore`] on every request,
//! without a session or its read cache.
//!
//! [`TrainingStore`]: trainreg_core::training::TrainingStore

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use trainreg_core::error::CoreError;
use trainreg_core::pagination::paginate;
use trainreg_core::session::AssignmentPage;
use trainreg_core::training::TrainingSummary;
use trainreg_core::types::{DbId, TrainingDate};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::AssignmentListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /systems/{id}/assignments`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAssignmentsRequest {
    #[validate(length(min = 1, message = "Select at least one employee"))]
    pub employee_ids: Vec<DbId>,
    /// Defaults to today when omitted.
    pub training_date: Option<TrainingDate>,
}

#[derive(Debug, Serialize)]
pub struct RegisterAssignmentsResponse {
    /// Rows actually created. Already-registered employees are not counted.
    pub inserted: u64,
    /// Distinct employees in the request.
    pub requested: usize,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// GET /api/v1/systems
pub async fn list_systems(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let systems = state.store.list_systems().await?;

    Ok(Json(DataResponse { data: systems }))
}

/// GET /api/v1/systems/{id}/untrained-employees
///
/// Employees with no assignment for the system, ordered by name.
pub async fn list_untrained_employees(
    State(state): State<AppState>,
    Path(system_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_system_exists(&state, system_id).await?;

    let employees = state.store.list_untrained_employees(system_id).await?;

    Ok(Json(DataResponse { data: employees }))
}

/// POST /api/v1/systems/{id}/assignments
///
/// Register the given employees for the system in one transaction.
/// Employees who already hold an assignment are skipped.
pub async fn register_assignments(
    State(state): State<AppState>,
    Path(system_id): Path<DbId>,
    Json(input): Json<RegisterAssignmentsRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_system_exists(&state, system_id).await?;

    let employee_ids: BTreeSet<DbId> = input.employee_ids.iter().copied().collect();
    let training_date = input
        .training_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let inserted = state
        .store
        .register_assignments(system_id, training_date, &employee_ids)
        .await?;

    let status = if inserted > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: RegisterAssignmentsResponse {
                inserted,
                requested: employee_ids.len(),
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// GET /api/v1/assignments?page=&page_size=
///
/// One page of the assignment list, newest first. Pages past the end are
/// clamped to the last page.
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> AppResult<impl IntoResponse> {
    let page_size = params.page_size()?;

    let rows = state.store.list_assignments().await?;

    let window = paginate(rows.len(), page_size, params.page());
    let page = AssignmentPage {
        rows: window.slice(&rows).to_vec(),
        window,
    };

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/summary
pub async fn get_summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let assignments = state.store.list_assignments().await?;
    let systems = state.store.list_systems().await?;

    Ok(Json(DataResponse {
        data: TrainingSummary::compute(&assignments, &systems),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_system_exists(state: &AppState, system_id: DbId) -> AppResult<()> {
    let systems = state.store.list_systems().await?;
    if systems.iter().any(|s| s.id == system_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "System",
            id: system_id,
        }))
    }
}
