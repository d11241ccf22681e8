//! Row structs for the training tables.
//!
//! Each row struct derives `FromRow` + `Serialize` and converts into the
//! matching `trainreg_core::training` record.

pub mod assignment;
pub mod employee;
pub mod system;
