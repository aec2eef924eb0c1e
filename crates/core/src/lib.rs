//! `ums-core` - shared building blocks for the university services.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, EntityKind, Record};
pub use error::{DomainError, DomainResult};
pub use id::{AssignmentId, CourseId, EnrollmentId, FacultyId, StudentId};
