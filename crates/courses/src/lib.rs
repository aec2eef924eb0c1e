//! Course domain module (owned by the Course service).

pub mod course;

pub use course::{Course, CourseFields};
