//! Domain core for the training registration service.
//!
//! Holds everything that does not need a database connection or an HTTP
//! stack: domain records, the [`training::TrainingStore`] data access seam,
//! pagination arithmetic, the time-bounded read cache, the registration
//! workflow and the per-session context that ties them together.

pub mod cache;
pub mod error;
pub mod notification;
pub mod pagination;
pub mod registration;
pub mod session;
pub mod training;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
