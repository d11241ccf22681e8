pub mod sessions;
pub mod training;
