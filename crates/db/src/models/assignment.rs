//! Assignment (`user_systems`) models.

use serde::Serialize;
use sqlx::FromRow;
use trainreg_core::training::AssignmentRecord;
use trainreg_core::types::{DbId, Timestamp, TrainingDate};

/// An assignment joined with employee and system names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    pub employee_id: DbId,
    pub employee_name: String,
    pub system_id: DbId,
    pub system_name: String,
    pub training_date: Option<TrainingDate>,
    pub assigned_at: Timestamp,
}

impl From<AssignmentDetail> for AssignmentRecord {
    fn from(row: AssignmentDetail) -> Self {
        Self {
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            system_id: row.system_id,
            system_name: row.system_name,
            training_date: row.training_date,
            assigned_at: row.assigned_at,
        }
    }
}
