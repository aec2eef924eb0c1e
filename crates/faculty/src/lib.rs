//! Faculty domain module: faculty records and their course assignments.

pub mod assignment;
pub mod faculty;

pub use assignment::{AssignOutcome, DuplicatePolicy, FacultyCourseAssignment, NewAssignment};
pub use faculty::{Faculty, FacultyFields};
