//! Enrollment domain module: student-course relationship rows.

pub mod enrollment;

pub use enrollment::{EnrollOutcome, Enrollment, NewEnrollment};
