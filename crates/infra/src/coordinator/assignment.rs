//! Faculty-course assignment coordinator: faculty check (local) → course
//! check (remote) → write.

use ums_core::{CourseId, EntityKind, FacultyId};
use ums_faculty::{AssignOutcome, DuplicatePolicy, NewAssignment};

use super::{require, CoordinatorError};
use crate::error::StoreError;
use crate::existence::{ExistenceCheck, UnknownPolicy};
use crate::relationship_store::AssignmentStore;

pub struct AssignmentCoordinator<S, Fa, Co> {
    store: S,
    faculty: Fa,
    courses: Co,
    duplicate_policy: DuplicatePolicy,
    unknown_policy: UnknownPolicy,
}

impl<S, Fa, Co> AssignmentCoordinator<S, Fa, Co>
where
    S: AssignmentStore,
    Fa: ExistenceCheck<FacultyId>,
    Co: ExistenceCheck<CourseId>,
{
    /// `faculty` is normally a `StoreExistence` over the co-located faculty
    /// store; `courses` asks the Course service.
    pub fn new(store: S, faculty: Fa, courses: Co) -> Self {
        Self {
            store,
            faculty,
            courses,
            duplicate_policy: DuplicatePolicy::default(),
            unknown_policy: UnknownPolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub async fn assign_course(
        &self,
        faculty_id: FacultyId,
        course_id: CourseId,
    ) -> Result<AssignOutcome, CoordinatorError> {
        let answer = self.faculty.check(faculty_id).await;
        require(EntityKind::Faculty, answer, self.unknown_policy)?;

        let answer = self.courses.check(course_id).await;
        require(EntityKind::Course, answer, self.unknown_policy)?;

        let new = NewAssignment::new(faculty_id, course_id);
        let written = match self.duplicate_policy {
            DuplicatePolicy::Allow => self.store.insert(new).await,
            DuplicatePolicy::Reject => self.store.insert_unique(new).await,
        };

        match written {
            Ok(row) => {
                tracing::info!(assignment_id = %row.id, %faculty_id, %course_id, "course assigned");
                Ok(AssignOutcome::Assigned(row))
            }
            Err(StoreError::Duplicate(_)) => match self.store.find(faculty_id, course_id).await? {
                Some(existing) => Ok(AssignOutcome::AlreadyAssigned(existing)),
                None => Err(CoordinatorError::Persistence(StoreError::Backend(format!(
                    "duplicate reported for (faculty {faculty_id}, course {course_id}) but no row found"
                )))),
            },
            Err(e) => {
                tracing::warn!(%faculty_id, %course_id, error = %e, "assignment write failed");
                Err(e.into())
            }
        }
    }

    /// Course ids assigned to the faculty member, in store order. Repeated
    /// assignments appear once per row.
    pub async fn courses_for_faculty(&self, faculty_id: FacultyId) -> Result<Vec<CourseId>, CoordinatorError> {
        let rows = self.store.by_faculty(faculty_id).await?;
        Ok(rows.into_iter().map(|a| a.course_id).collect())
    }
}
