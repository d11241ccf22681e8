//! Repository for the `systems` table.

use sqlx::PgPool;

use crate::models::system::System;

/// Read access to systems. Rows are created and removed outside this service.
pub struct SystemRepo;

impl SystemRepo {
    /// List all systems ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<System>, sqlx::Error> {
        sqlx::query_as::<_, System>("SELECT id, name FROM systems ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
