//! Faculty-course assignment rows and the outcome of an assignment attempt.

use serde::{Deserialize, Serialize};

use ums_core::{AssignmentId, CourseId, FacultyId};

/// Relationship row linking a faculty member to a course.
///
/// Both sides are plain identifiers captured at write time; neither is kept in
/// sync with its owning store afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyCourseAssignment {
    pub id: AssignmentId,
    pub faculty_id: FacultyId,
    pub course_id: CourseId,
}

/// An assignment that has passed validation but has no id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssignment {
    pub faculty_id: FacultyId,
    pub course_id: CourseId,
}

impl NewAssignment {
    pub fn new(faculty_id: FacultyId, course_id: CourseId) -> Self {
        Self { faculty_id, course_id }
    }

    pub fn into_assignment(self, id: AssignmentId) -> FacultyCourseAssignment {
        FacultyCourseAssignment {
            id,
            faculty_id: self.faculty_id,
            course_id: self.course_id,
        }
    }
}

/// Whether repeated assignment of the same (faculty, course) pair is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Write every request; identical calls produce identical rows.
    #[default]
    Allow,
    /// At most one row per pair; repeats report `AlreadyAssigned`.
    Reject,
}

/// Result of a successful assignment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned(FacultyCourseAssignment),
    AlreadyAssigned(FacultyCourseAssignment),
}

impl AssignOutcome {
    pub fn assignment(&self) -> &FacultyCourseAssignment {
        match self {
            AssignOutcome::Assigned(a) | AssignOutcome::AlreadyAssigned(a) => a,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, AssignOutcome::Assigned(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            AssignOutcome::Assigned(_) => "Course assigned to faculty",
            AssignOutcome::AlreadyAssigned(_) => "Course already assigned to faculty",
        }
    }
}
