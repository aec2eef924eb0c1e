//! Many-to-many relationship rows (enrollments, faculty-course assignments).
//!
//! Rows hold plain identifiers. Lookups return rows in store order
//! (ascending row id, i.e. insertion order).

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use ums_core::{CourseId, FacultyId, StudentId};
use ums_enrollment::{Enrollment, NewEnrollment};
use ums_faculty::{FacultyCourseAssignment, NewAssignment};

use crate::error::StoreError;

pub use in_memory::{InMemoryAssignmentStore, InMemoryEnrollmentStore};
pub use postgres::{PostgresAssignmentStore, PostgresEnrollmentStore};

/// Enrollment rows, unique per (student, course).
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Persist a row. Must fail with `StoreError::Duplicate` if the pair is
    /// already recorded, atomically with respect to concurrent inserts.
    async fn insert(&self, new: NewEnrollment) -> Result<Enrollment, StoreError>;

    async fn find(&self, student_id: StudentId, course_id: CourseId) -> Result<Option<Enrollment>, StoreError>;

    async fn by_student(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError>;

    async fn by_course(&self, course_id: CourseId) -> Result<Vec<Enrollment>, StoreError>;
}

/// Faculty-course assignment rows. No uniqueness is implied by `insert`.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Persist a row unconditionally.
    async fn insert(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError>;

    /// Persist a row unless one exists for the pair (`StoreError::Duplicate`).
    /// The check and the write are atomic.
    async fn insert_unique(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError>;

    /// First row recorded for the pair, if any.
    async fn find(
        &self,
        faculty_id: FacultyId,
        course_id: CourseId,
    ) -> Result<Option<FacultyCourseAssignment>, StoreError>;

    async fn by_faculty(&self, faculty_id: FacultyId) -> Result<Vec<FacultyCourseAssignment>, StoreError>;
}

#[async_trait]
impl<S: EnrollmentStore + ?Sized> EnrollmentStore for Arc<S> {
    async fn insert(&self, new: NewEnrollment) -> Result<Enrollment, StoreError> {
        (**self).insert(new).await
    }

    async fn find(&self, student_id: StudentId, course_id: CourseId) -> Result<Option<Enrollment>, StoreError> {
        (**self).find(student_id, course_id).await
    }

    async fn by_student(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError> {
        (**self).by_student(student_id).await
    }

    async fn by_course(&self, course_id: CourseId) -> Result<Vec<Enrollment>, StoreError> {
        (**self).by_course(course_id).await
    }
}

#[async_trait]
impl<S: AssignmentStore + ?Sized> AssignmentStore for Arc<S> {
    async fn insert(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError> {
        (**self).insert(new).await
    }

    async fn insert_unique(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError> {
        (**self).insert_unique(new).await
    }

    async fn find(
        &self,
        faculty_id: FacultyId,
        course_id: CourseId,
    ) -> Result<Option<FacultyCourseAssignment>, StoreError> {
        (**self).find(faculty_id, course_id).await
    }

    async fn by_faculty(&self, faculty_id: FacultyId) -> Result<Vec<FacultyCourseAssignment>, StoreError> {
        (**self).by_faculty(faculty_id).await
    }
}
