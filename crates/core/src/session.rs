//! Per-session context and its event loop.
//!
//! A [`SessionContext`] owns everything one user's screen needs between
//! requests. Each request is one [`SessionAction`]: the action is applied,
//! then [`SessionContext::render`] recomputes the whole [`SessionView`] from
//! the (cached) store data. There is no incremental update path.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheWindows, ReadCache};
use crate::notification::{Notification, NotificationQueue};
use crate::pagination::{PageCursor, PageSize, PageWindow, PAGE_SIZES};
use crate::registration::{self, Selection, WorkflowOutcome, WorkflowState};
use crate::training::{AssignmentRecord, Employee, System, TrainingStore, TrainingSummary};
use crate::types::{DbId, TrainingDate};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Everything a client can ask a session to do.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    SelectSystem { system_id: DbId },
    SetTrainingDate { training_date: TrainingDate },
    SelectEmployees { employee_ids: Vec<DbId> },
    SetPageSize { page_size: PageSize },
    GoToPage { page: usize },
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    RequestRegistration,
    ConfirmRegistration,
    CancelRegistration,
    /// Drop every cached read so the next render hits the store.
    Refresh,
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// One page of the assignment table.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentPage {
    pub rows: Vec<AssignmentRecord>,
    #[serde(flatten)]
    pub window: PageWindow,
}

/// The registration form. Absent when no system exists.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPanel {
    pub system_id: DbId,
    pub training_date: Option<TrainingDate>,
    pub selected_employee_ids: Vec<DbId>,
    pub untrained_employees: Vec<Employee>,
    /// Every employee already holds an assignment for the selected system.
    pub all_trained: bool,
    pub can_submit: bool,
}

/// Everything the presentation layer needs to draw the screen.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub summary: TrainingSummary,
    pub assignments: AssignmentPage,
    pub page_sizes: [u32; 4],
    pub systems: Vec<System>,
    pub registration: Option<RegistrationPanel>,
    pub workflow: WorkflowState,
    pub notifications: Vec<Notification>,
}

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SessionContext {
    pub(crate) cache: ReadCache,
    pub(crate) cursor: PageCursor,
    pub(crate) selection: Selection,
    pub(crate) workflow: WorkflowState,
    pub(crate) notifications: NotificationQueue,
}

impl SessionContext {
    /// Start a session. The training date picker defaults to `today`.
    pub fn new(windows: CacheWindows, today: TrainingDate) -> Self {
        Self {
            cache: ReadCache::new(windows),
            cursor: PageCursor::default(),
            selection: Selection {
                training_date: Some(today),
                ..Selection::default()
            },
            workflow: WorkflowState::Idle,
            notifications: NotificationQueue::default(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn workflow(&self) -> &WorkflowState {
        &self.workflow
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Apply `action` and render the resulting view.
    pub async fn dispatch(
        &mut self,
        action: SessionAction,
        store: &dyn TrainingStore,
    ) -> SessionView {
        let now = Instant::now();
        self.apply(action, store, now).await;
        self.render(store, now).await
    }

    /// Apply one state transition without rendering.
    pub async fn apply(&mut self, action: SessionAction, store: &dyn TrainingStore, now: Instant) {
        match action {
            SessionAction::SelectSystem { system_id } => {
                if self.selection.system_id != Some(system_id) {
                    self.selection.system_id = Some(system_id);
                    self.selection.employee_ids.clear();
                }
            }
            SessionAction::SetTrainingDate { training_date } => {
                self.selection.training_date = Some(training_date);
            }
            SessionAction::SelectEmployees { employee_ids } => {
                self.selection.employee_ids = employee_ids;
            }
            SessionAction::SetPageSize { page_size } => {
                self.cursor.set_page_size(page_size);
            }
            SessionAction::GoToPage { page } => {
                let total = self.assignment_count(store, now).await;
                self.cursor.go_to(page, total);
            }
            SessionAction::FirstPage => {
                let total = self.assignment_count(store, now).await;
                self.cursor.first(total);
            }
            SessionAction::PreviousPage => {
                let total = self.assignment_count(store, now).await;
                self.cursor.previous(total);
            }
            SessionAction::NextPage => {
                let total = self.assignment_count(store, now).await;
                self.cursor.next(total);
            }
            SessionAction::LastPage => {
                let total = self.assignment_count(store, now).await;
                self.cursor.last(total);
            }
            SessionAction::RequestRegistration => {
                let loaded = self.cache.systems(store, now).await.map(|_| ());
                let outcome = match loaded {
                    Ok(()) => registration::request_registration(self),
                    Err(err) => {
                        self.notifications.push(Notification::from(&err));
                        WorkflowOutcome::Rejected
                    }
                };
                log_outcome("request", outcome);
            }
            SessionAction::ConfirmRegistration => {
                let outcome = registration::confirm_registration(self, store, now).await;
                log_outcome("confirm", outcome);
            }
            SessionAction::CancelRegistration => {
                let outcome = registration::cancel_registration(self);
                log_outcome("cancel", outcome);
            }
            SessionAction::Refresh => {
                self.cache.invalidate_all();
            }
        }
    }

    /// Recompute the full view model. Read failures become error
    /// notifications and empty lists; rendering itself never fails.
    pub async fn render(&mut self, store: &dyn TrainingStore, now: Instant) -> SessionView {
        let systems = match self.cache.systems(store, now).await {
            Ok(rows) => Some(rows.to_vec()),
            Err(err) => {
                self.notifications.push(Notification::from(&err));
                None
            }
        };
        if let Some(systems) = &systems {
            self.default_system(systems);
        }
        let systems = systems.unwrap_or_default();

        let assignments = match self.cache.assignments(store, now).await {
            Ok(rows) => rows.to_vec(),
            Err(err) => {
                self.notifications.push(Notification::from(&err));
                Vec::new()
            }
        };
        let window = self.cursor.window(assignments.len());
        let page = AssignmentPage {
            rows: window.slice(&assignments).to_vec(),
            window,
        };

        let registration = match self.selection.system_id {
            Some(system_id) if !systems.is_empty() => {
                Some(self.registration_panel(store, system_id, now).await)
            }
            _ => None,
        };

        SessionView {
            summary: TrainingSummary::compute(&assignments, &systems),
            assignments: page,
            page_sizes: PAGE_SIZES,
            systems,
            registration,
            workflow: self.workflow.clone(),
            notifications: self.notifications.drain(),
        }
    }

    /// Keep the selected system pointing at an existing one, falling back to
    /// the first system by name.
    fn default_system(&mut self, systems: &[System]) {
        let selected_exists = self
            .selection
            .system_id
            .is_some_and(|id| systems.iter().any(|s| s.id == id));
        if !selected_exists {
            self.selection.system_id = systems.first().map(|s| s.id);
            self.selection.employee_ids.clear();
        }
    }

    async fn registration_panel(
        &mut self,
        store: &dyn TrainingStore,
        system_id: DbId,
        now: Instant,
    ) -> RegistrationPanel {
        let untrained = match self.cache.untrained_employees(store, system_id, now).await {
            Ok(rows) => rows.to_vec(),
            Err(err) => {
                self.notifications.push(Notification::from(&err));
                Vec::new()
            }
        };
        let all_trained = untrained.is_empty();

        RegistrationPanel {
            system_id,
            training_date: self.selection.training_date,
            selected_employee_ids: self.selection.employee_ids.clone(),
            can_submit: !all_trained && self.workflow.is_idle(),
            all_trained,
            untrained_employees: untrained,
        }
    }

    async fn assignment_count(&mut self, store: &dyn TrainingStore, now: Instant) -> usize {
        match self.cache.assignments(store, now).await {
            Ok(rows) => rows.len(),
            Err(err) => {
                self.notifications.push(Notification::from(&err));
                0
            }
        }
    }
}

fn log_outcome(trigger: &'static str, outcome: WorkflowOutcome) {
    match outcome {
        WorkflowOutcome::Committed { inserted } => {
            tracing::info!(trigger, inserted, "Registration committed");
        }
        WorkflowOutcome::Failed => tracing::warn!(trigger, "Registration failed"),
        other => tracing::debug!(trigger, outcome = ?other, "Registration workflow transition"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
