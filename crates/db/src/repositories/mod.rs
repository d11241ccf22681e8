//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod assignment_repo;
pub mod employee_repo;
pub mod system_repo;

pub use assignment_repo::AssignmentRepo;
pub use employee_repo::EmployeeRepo;
pub use system_repo::SystemRepo;
