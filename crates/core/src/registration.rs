//! Registration workflow: `Idle -> PendingConfirmation -> (Committed |
//! Cancelled) -> Idle`.
//!
//! A registration request only snapshots the current form selection. Nothing
//! reaches the store until the user confirms; every transition ends back in
//! `Idle`, whether the commit succeeded, failed or was cancelled.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::notification::Notification;
use crate::session::SessionContext;
use crate::training::TrainingStore;
use crate::types::{DbId, TrainingDate};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_EMPTY_SELECTION: &str = "Select at least one employee to register.";
pub const MSG_NO_SYSTEMS: &str = "No systems are available for registration.";
pub const MSG_NO_SYSTEM_SELECTED: &str = "Select a system first.";
pub const MSG_NO_TRAINING_DATE: &str = "Select a training date.";
pub const MSG_ALREADY_PENDING: &str =
    "A registration is already awaiting confirmation. Confirm or cancel it first.";
pub const MSG_NOTHING_PENDING: &str = "There is no registration awaiting confirmation.";
pub const MSG_ALREADY_REGISTERED: &str =
    "Selected user(s) were already registered for this system.";
pub const MSG_CANCELLED: &str = "Registration cancelled.";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// An unconfirmed proposal to create assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRegistration {
    pub system_id: DbId,
    pub system_name: String,
    /// Selection order, duplicates removed.
    pub employee_ids: Vec<DbId>,
    pub training_date: TrainingDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Idle,
    PendingConfirmation { pending: PendingRegistration },
}

impl WorkflowState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn pending(&self) -> Option<&PendingRegistration> {
        match self {
            Self::PendingConfirmation { pending } => Some(pending),
            Self::Idle => None,
        }
    }
}

/// What the user currently has selected in the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub system_id: Option<DbId>,
    pub training_date: Option<TrainingDate>,
    pub employee_ids: Vec<DbId>,
}

/// Result of one workflow trigger, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// A snapshot was captured and awaits confirmation.
    Pending,
    /// The snapshot was written; `inserted` excludes skipped duplicates.
    Committed { inserted: u64 },
    Cancelled,
    /// A guard blocked the trigger; the state did not change.
    Rejected,
    /// The store rejected the commit; the snapshot was discarded.
    Failed,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

fn reject(session: &mut SessionContext, message: &str) -> WorkflowOutcome {
    session.notifications.push(Notification::warning(message));
    WorkflowOutcome::Rejected
}

/// `Idle -> PendingConfirmation`.
///
/// Validates against the systems currently held in the session cache; the
/// caller is expected to have loaded them.
pub fn request_registration(session: &mut SessionContext) -> WorkflowOutcome {
    if !session.workflow.is_idle() {
        return reject(session, MSG_ALREADY_PENDING);
    }

    let systems = session.cache.cached_systems();
    if systems.is_empty() {
        return reject(session, MSG_NO_SYSTEMS);
    }

    let system = session
        .selection
        .system_id
        .and_then(|id| systems.iter().find(|s| s.id == id))
        .cloned();
    let Some(system) = system else {
        return reject(session, MSG_NO_SYSTEM_SELECTED);
    };

    if session.selection.employee_ids.is_empty() {
        return reject(session, MSG_EMPTY_SELECTION);
    }

    let Some(training_date) = session.selection.training_date else {
        return reject(session, MSG_NO_TRAINING_DATE);
    };

    let mut seen = HashSet::new();
    let employee_ids: Vec<DbId> = session
        .selection
        .employee_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    session.notifications.push(Notification::info(format!(
        "Confirm registration of {} employee(s) for {} (trained {training_date}).",
        employee_ids.len(),
        system.name,
    )));
    session.workflow = WorkflowState::PendingConfirmation {
        pending: PendingRegistration {
            system_id: system.id,
            system_name: system.name,
            employee_ids,
            training_date,
        },
    };
    WorkflowOutcome::Pending
}

/// `PendingConfirmation -> Committed | failed -> Idle`.
///
/// On success the assignment cache and the untrained cache of the affected
/// system are invalidated and the assignment list is reloaded.
pub async fn confirm_registration(
    session: &mut SessionContext,
    store: &dyn TrainingStore,
    now: Instant,
) -> WorkflowOutcome {
    let pending = match std::mem::take(&mut session.workflow) {
        WorkflowState::PendingConfirmation { pending } => pending,
        WorkflowState::Idle => return reject(session, MSG_NOTHING_PENDING),
    };

    let employee_ids: BTreeSet<DbId> = pending.employee_ids.iter().copied().collect();
    let result = store
        .register_assignments(pending.system_id, pending.training_date, &employee_ids)
        .await;

    match result {
        Ok(inserted) => {
            session.cache.invalidate_assignments();
            session.cache.invalidate_untrained(pending.system_id);
            if let Err(err) = session.cache.assignments(store, now).await {
                session.notifications.push(Notification::from(&err));
            }

            session.selection.employee_ids.clear();

            let notification = if inserted > 0 {
                Notification::success(format!("{inserted} user(s) successfully registered"))
            } else {
                Notification::warning(MSG_ALREADY_REGISTERED)
            };
            session.notifications.push(notification);
            WorkflowOutcome::Committed { inserted }
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                system_id = pending.system_id,
                requested = employee_ids.len(),
                "Registration commit failed"
            );
            session.notifications.push(Notification::from(&err));
            WorkflowOutcome::Failed
        }
    }
}

/// `PendingConfirmation -> Cancelled -> Idle`.
pub fn cancel_registration(session: &mut SessionContext) -> WorkflowOutcome {
    match std::mem::take(&mut session.workflow) {
        WorkflowState::PendingConfirmation { .. } => {
            session.notifications.push(Notification::info(MSG_CANCELLED));
            WorkflowOutcome::Cancelled
        }
        WorkflowState::Idle => reject(session, MSG_NOTHING_PENDING),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
