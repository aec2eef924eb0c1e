use std::sync::RwLock;

use async_trait::async_trait;
use ums_core::{AssignmentId, CourseId, EnrollmentId, FacultyId, StudentId};
use ums_enrollment::{Enrollment, NewEnrollment};
use ums_faculty::{FacultyCourseAssignment, NewAssignment};

use super::{AssignmentStore, EnrollmentStore};
use crate::error::StoreError;

#[derive(Debug)]
struct Rows<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T> Rows<T> {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory enrollment rows.
///
/// The duplicate check and the append happen under one write lock, which is
/// what makes the pair unique under concurrent inserts.
#[derive(Debug, Default)]
pub struct InMemoryEnrollmentStore {
    inner: RwLock<Rows<Enrollment>>,
}

impl InMemoryEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, pred: impl Fn(&Enrollment) -> bool) -> Result<Vec<Enrollment>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.rows.iter().filter(|e| pred(e)).copied().collect())
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryEnrollmentStore {
    async fn insert(&self, new: NewEnrollment) -> Result<Enrollment, StoreError> {
        let mut rows = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        if rows.rows.iter().any(|e| (e.student_id, e.course_id) == new.pair()) {
            return Err(StoreError::Duplicate(format!(
                "enrollment (student {}, course {})",
                new.student_id, new.course_id
            )));
        }

        let id = rows.next_id();
        let row = new.into_enrollment(EnrollmentId::new(id));
        rows.rows.push(row);
        Ok(row)
    }

    async fn find(&self, student_id: StudentId, course_id: CourseId) -> Result<Option<Enrollment>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows
            .rows
            .iter()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .copied())
    }

    async fn by_student(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError> {
        self.select(|e| e.student_id == student_id)
    }

    async fn by_course(&self, course_id: CourseId) -> Result<Vec<Enrollment>, StoreError> {
        self.select(|e| e.course_id == course_id)
    }
}

/// In-memory faculty-course assignment rows.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    inner: RwLock<Rows<FacultyCourseAssignment>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn insert(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError> {
        let mut rows = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = rows.next_id();
        let row = new.into_assignment(AssignmentId::new(id));
        rows.rows.push(row);
        Ok(row)
    }

    async fn insert_unique(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError> {
        let mut rows = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        if rows
            .rows
            .iter()
            .any(|a| a.faculty_id == new.faculty_id && a.course_id == new.course_id)
        {
            return Err(StoreError::Duplicate(format!(
                "assignment (faculty {}, course {})",
                new.faculty_id, new.course_id
            )));
        }

        let id = rows.next_id();
        let row = new.into_assignment(AssignmentId::new(id));
        rows.rows.push(row);
        Ok(row)
    }

    async fn find(
        &self,
        faculty_id: FacultyId,
        course_id: CourseId,
    ) -> Result<Option<FacultyCourseAssignment>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows
            .rows
            .iter()
            .find(|a| a.faculty_id == faculty_id && a.course_id == course_id)
            .copied())
    }

    async fn by_faculty(&self, faculty_id: FacultyId) -> Result<Vec<FacultyCourseAssignment>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.rows.iter().filter(|a| a.faculty_id == faculty_id).copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn enrollment(s: i64, c: i64) -> NewEnrollment {
        NewEnrollment::new(StudentId::new(s), CourseId::new(c), today())
    }

    #[tokio::test]
    async fn enrollment_pair_is_unique() {
        let store = InMemoryEnrollmentStore::new();
        store.insert(enrollment(1, 10)).await.unwrap();

        let err = store.insert(enrollment(1, 10)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.by_student(StudentId::new(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lookups_preserve_insertion_order() {
        let store = InMemoryEnrollmentStore::new();
        store.insert(enrollment(1, 30)).await.unwrap();
        store.insert(enrollment(2, 10)).await.unwrap();
        store.insert(enrollment(1, 10)).await.unwrap();
        store.insert(enrollment(1, 20)).await.unwrap();

        let courses: Vec<_> = store
            .by_student(StudentId::new(1))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.course_id.get())
            .collect();
        assert_eq!(courses, vec![30, 10, 20]);

        let students: Vec<_> = store
            .by_course(CourseId::new(10))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.student_id.get())
            .collect();
        assert_eq!(students, vec![2, 1]);

        assert!(store.by_student(StudentId::new(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn plain_assignment_insert_keeps_duplicates() {
        let store = InMemoryAssignmentStore::new();
        let pair = NewAssignment::new(FacultyId::new(1), CourseId::new(10));
        let first = store.insert(pair).await.unwrap();
        let second = store.insert(pair).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.by_faculty(FacultyId::new(1)).await.unwrap().len(), 2);
        assert_eq!(store.find(FacultyId::new(1), CourseId::new(10)).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn unique_assignment_insert_rejects_existing_pair() {
        let store = InMemoryAssignmentStore::new();
        let pair = NewAssignment::new(FacultyId::new(4), CourseId::new(2));
        store.insert_unique(pair).await.unwrap();

        let err = store.insert_unique(pair).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.by_faculty(FacultyId::new(4)).await.unwrap().len(), 1);
    }
}
