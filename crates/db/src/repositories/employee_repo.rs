//! Repository for the `employees` table.

use sqlx::PgPool;
use trainreg_core::types::DbId;

use crate::models::employee::Employee;

/// Read access to employees. Rows are created and removed outside this
/// service.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// List employees with no assignment for `system_id`, ordered by name.
    pub async fn list_untrained_for_system(
        pool: &PgPool,
        system_id: DbId,
    ) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            "SELECT e.id, e.name FROM employees e \
             WHERE NOT EXISTS ( \
                 SELECT 1 FROM user_systems us \
                 WHERE us.user_id = e.id AND us.system_id = $1 \
             ) \
             ORDER BY e.name, e.id",
        )
        .bind(system_id)
        .fetch_all(pool)
        .await
    }
}
