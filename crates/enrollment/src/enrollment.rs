use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ums_core::{CourseId, EnrollmentId, StudentId};

/// Relationship row linking a student to a course.
///
/// At most one row exists per (student_id, course_id). `enrollment_date` is
/// fixed at creation and never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrollment_date: NaiveDate,
}

/// A validated enrollment awaiting persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEnrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrollment_date: NaiveDate,
}

impl NewEnrollment {
    pub fn new(student_id: StudentId, course_id: CourseId, enrollment_date: NaiveDate) -> Self {
        Self {
            student_id,
            course_id,
            enrollment_date,
        }
    }

    pub fn into_enrollment(self, id: EnrollmentId) -> Enrollment {
        Enrollment {
            id,
            student_id: self.student_id,
            course_id: self.course_id,
            enrollment_date: self.enrollment_date,
        }
    }

    pub fn pair(&self) -> (StudentId, CourseId) {
        (self.student_id, self.course_id)
    }
}

/// Result of a successful enrollment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Created(Enrollment),
    /// The pair was already recorded; carries the existing row.
    AlreadyEnrolled(Enrollment),
}

impl EnrollOutcome {
    pub fn enrollment(&self) -> &Enrollment {
        match self {
            EnrollOutcome::Created(e) | EnrollOutcome::AlreadyEnrolled(e) => e,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, EnrollOutcome::Created(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            EnrollOutcome::Created(_) => "Enrollment successful",
            EnrollOutcome::AlreadyEnrolled(_) => "Student already enrolled in this course",
        }
    }
}
