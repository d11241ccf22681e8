//! Domain records for employees, systems and their training assignments,
//! plus the [`TrainingStore`] seam the rest of the core reads and writes
//! through.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp, TrainingDate};

/// An employee that can be registered against systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
}

/// A system employees get trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub id: DbId,
    pub name: String,
}

/// One row of the assignment table joined with employee and system names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub employee_id: DbId,
    pub employee_name: String,
    pub system_id: DbId,
    pub system_name: String,
    pub training_date: Option<TrainingDate>,
    pub assigned_at: Timestamp,
}

/// Read and write access to the relational store.
///
/// Every implementation must keep the ordering guarantees documented on each
/// method; the session layer relies on them for stable pagination.
#[async_trait]
pub trait TrainingStore: Send + Sync {
    /// All assignments, newest first, then by employee name, then system name.
    async fn list_assignments(&self) -> Result<Vec<AssignmentRecord>, CoreError>;

    /// All systems ordered by name.
    async fn list_systems(&self) -> Result<Vec<System>, CoreError>;

    /// Employees with no assignment for `system_id`, ordered by name.
    async fn list_untrained_employees(&self, system_id: DbId)
        -> Result<Vec<Employee>, CoreError>;

    /// Insert one assignment per employee in a single transaction.
    ///
    /// Pairs that already exist are skipped silently. Returns how many rows
    /// were actually created. Any other failure rolls back the whole batch.
    async fn register_assignments(
        &self,
        system_id: DbId,
        training_date: TrainingDate,
        employee_ids: &BTreeSet<DbId>,
    ) -> Result<u64, CoreError>;
}

/// Top-line counters shown above the assignment table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrainingSummary {
    /// Distinct employees holding at least one assignment.
    pub trained_employees: usize,
    pub total_systems: usize,
    pub total_assignments: usize,
}

impl TrainingSummary {
    /// Compute the counters from materialized query results.
    ///
    /// "Trained" counts distinct employee ids, not (employee, system) pairs.
    pub fn compute(assignments: &[AssignmentRecord], systems: &[System]) -> Self {
        let trained_employees = assignments
            .iter()
            .map(|a| a.employee_id)
            .collect::<HashSet<_>>()
            .len();

        Self {
            trained_employees,
            total_systems: systems.len(),
            total_assignments: assignments.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
