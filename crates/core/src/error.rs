use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The relational store could not be reached or rejected a query.
    /// Carries the driver's message so it can be shown to the user verbatim.
    #[error("Data access failure: {0}")]
    DataAccess(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
