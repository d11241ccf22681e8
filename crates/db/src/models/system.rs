//! System entity model.

use serde::Serialize;
use sqlx::FromRow;
use trainreg_core::types::DbId;

/// A row from the `systems` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct System {
    pub id: DbId,
    pub name: String,
}

impl From<System> for trainreg_core::training::System {
    fn from(row: System) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
