//! [`TrainingStore`] backed by the PostgreSQL repositories.

use std::collections::BTreeSet;

use async_trait::async_trait;
use trainreg_core::error::CoreError;
use trainreg_core::training::{AssignmentRecord, Employee, System, TrainingStore};
use trainreg_core::types::{DbId, TrainingDate};

use crate::repositories::{AssignmentRepo, EmployeeRepo, SystemRepo};
use crate::DbPool;

/// Adapts the repositories to the core data access trait, turning every
/// driver error into [`CoreError::DataAccess`].
#[derive(Debug, Clone)]
pub struct PgTrainingStore {
    pool: DbPool,
}

impl PgTrainingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn data_access(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Data access failure");
    CoreError::DataAccess(err.to_string())
}

#[async_trait]
impl TrainingStore for PgTrainingStore {
    async fn list_assignments(&self) -> Result<Vec<AssignmentRecord>, CoreError> {
        let rows = AssignmentRepo::list_detailed(&self.pool)
            .await
            .map_err(data_access)?;
        Ok(rows.into_iter().map(AssignmentRecord::from).collect())
    }

    async fn list_systems(&self) -> Result<Vec<System>, CoreError> {
        let rows = SystemRepo::list(&self.pool).await.map_err(data_access)?;
        Ok(rows.into_iter().map(System::from).collect())
    }

    async fn list_untrained_employees(
        &self,
        system_id: DbId,
    ) -> Result<Vec<Employee>, CoreError> {
        let rows = EmployeeRepo::list_untrained_for_system(&self.pool, system_id)
            .await
            .map_err(data_access)?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn register_assignments(
        &self,
        system_id: DbId,
        training_date: TrainingDate,
        employee_ids: &BTreeSet<DbId>,
    ) -> Result<u64, CoreError> {
        let inserted = AssignmentRepo::register(&self.pool, system_id, training_date, employee_ids)
            .await
            .map_err(data_access)?;
        tracing::info!(
            system_id,
            requested = employee_ids.len(),
            inserted,
            "Registered assignments"
        );
        Ok(inserted)
    }
}
