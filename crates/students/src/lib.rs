//! Student domain module (owned by the Student service).

pub mod student;

pub use student::{Student, StudentFields};
