//! Repository for the `user_systems` table.

use std::collections::BTreeSet;

use sqlx::PgPool;
use trainreg_core::types::{DbId, TrainingDate};

use crate::models::assignment::AssignmentDetail;

/// Provides listing and idempotent registration of assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// List every assignment joined with employee and system names.
    ///
    /// Newest first, then by employee name, then by system name.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentDetail>(
            "SELECT e.id AS employee_id, \
                    e.name AS employee_name, \
                    s.id AS system_id, \
                    s.name AS system_name, \
                    us.training_date, \
                    us.assigned_date AS assigned_at \
             FROM user_systems us \
             JOIN employees e ON e.id = us.user_id \
             JOIN systems s ON s.id = us.system_id \
             ORDER BY us.assigned_date DESC, e.name, s.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Register `employee_ids` on `system_id` within one transaction.
    ///
    /// Pairs that already exist are skipped via `ON CONFLICT DO NOTHING`.
    /// Returns the number of rows actually inserted. Any other error (for
    /// example an unknown employee or system id) rolls back the whole batch.
    pub async fn register(
        pool: &PgPool,
        system_id: DbId,
        training_date: TrainingDate,
        employee_ids: &BTreeSet<DbId>,
    ) -> Result<u64, sqlx::Error> {
        if employee_ids.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for &employee_id in employee_ids {
            let result = sqlx::query(
                "INSERT INTO user_systems (user_id, system_id, training_date) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (user_id, system_id) DO NOTHING",
            )
            .bind(employee_id)
            .bind(system_id)
            .bind(training_date)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
