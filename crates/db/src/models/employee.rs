//! Employee entity model.

use serde::Serialize;
use sqlx::FromRow;
use trainreg_core::types::DbId;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
}

impl From<Employee> for trainreg_core::training::Employee {
    fn from(row: Employee) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
