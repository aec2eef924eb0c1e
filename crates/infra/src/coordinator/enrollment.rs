//! Enrollment coordinator: student check → course check → duplicate check → write.

use chrono::{NaiveDate, Utc};
use ums_core::{CourseId, EntityKind, StudentId};
use ums_enrollment::{EnrollOutcome, NewEnrollment};

use super::{require, CoordinatorError};
use crate::error::StoreError;
use crate::existence::{ExistenceCheck, UnknownPolicy};
use crate::relationship_store::EnrollmentStore;

/// Enrolls students in courses owned by other services.
///
/// `students` and `courses` are usually `HttpExistenceClient`s pointed at the
/// peer services; the relationship store is local to this service.
pub struct EnrollmentCoordinator<S, St, Co> {
    store: S,
    students: St,
    courses: Co,
    unknown_policy: UnknownPolicy,
}

impl<S, St, Co> EnrollmentCoordinator<S, St, Co>
where
    S: EnrollmentStore,
    St: ExistenceCheck<StudentId>,
    Co: ExistenceCheck<CourseId>,
{
    pub fn new(store: S, students: St, courses: Co) -> Self {
        Self {
            store,
            students,
            courses,
            unknown_policy: UnknownPolicy::default(),
        }
    }

    pub fn with_unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    /// Enroll with today's (UTC) date as the enrollment date.
    pub async fn enroll(&self, student_id: StudentId, course_id: CourseId) -> Result<EnrollOutcome, CoordinatorError> {
        self.enroll_on(student_id, course_id, Utc::now().date_naive()).await
    }

    pub async fn enroll_on(
        &self,
        student_id: StudentId,
        course_id: CourseId,
        date: NaiveDate,
    ) -> Result<EnrollOutcome, CoordinatorError> {
        let answer = self.students.check(student_id).await;
        require(EntityKind::Student, answer, self.unknown_policy)?;

        let answer = self.courses.check(course_id).await;
        require(EntityKind::Course, answer, self.unknown_policy)?;

        if let Some(existing) = self.store.find(student_id, course_id).await? {
            tracing::debug!(%student_id, %course_id, "already enrolled");
            return Ok(EnrollOutcome::AlreadyEnrolled(existing));
        }

        match self.store.insert(NewEnrollment::new(student_id, course_id, date)).await {
            Ok(row) => {
                tracing::info!(enrollment_id = %row.id, %student_id, %course_id, "enrollment created");
                Ok(EnrollOutcome::Created(row))
            }
            // A concurrent request wrote the pair between the check and the insert.
            Err(StoreError::Duplicate(_)) => match self.store.find(student_id, course_id).await? {
                Some(existing) => Ok(EnrollOutcome::AlreadyEnrolled(existing)),
                None => Err(CoordinatorError::Persistence(StoreError::Backend(format!(
                    "duplicate reported for (student {student_id}, course {course_id}) but no row found"
                )))),
            },
            Err(e) => {
                tracing::warn!(%student_id, %course_id, error = %e, "enrollment write failed");
                Err(e.into())
            }
        }
    }

    /// Course ids the student is enrolled in, in store order. Empty if none.
    pub async fn courses_for_student(&self, student_id: StudentId) -> Result<Vec<CourseId>, CoordinatorError> {
        let rows = self.store.by_student(student_id).await?;
        Ok(rows.into_iter().map(|e| e.course_id).collect())
    }

    /// Student ids enrolled in the course, in store order. Empty if none.
    pub async fn students_for_course(&self, course_id: CourseId) -> Result<Vec<StudentId>, CoordinatorError> {
        let rows = self.store.by_course(course_id).await?;
        Ok(rows.into_iter().map(|e| e.student_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use proptest::prelude::*;
    use ums_enrollment::Enrollment;

    use crate::existence::testing::FakeCheck;
    use crate::existence::Existence;
    use crate::relationship_store::InMemoryEnrollmentStore;

    type Coordinator = EnrollmentCoordinator<Arc<InMemoryEnrollmentStore>, Arc<FakeCheck>, Arc<FakeCheck>>;

    fn setup(students: &[i64], courses: &[i64]) -> (Coordinator, Arc<InMemoryEnrollmentStore>, Arc<FakeCheck>, Arc<FakeCheck>) {
        let store = Arc::new(InMemoryEnrollmentStore::new());
        let s = FakeCheck::with(students);
        let c = FakeCheck::with(courses);
        (EnrollmentCoordinator::new(store.clone(), s.clone(), c.clone()), store, s, c)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn enroll_creates_one_row_with_given_date() {
        let (coord, store, _, _) = setup(&[1], &[10]);

        let outcome = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap();

        assert!(outcome.is_new());
        assert_eq!(outcome.message(), "Enrollment successful");
        assert_eq!(outcome.enrollment().enrollment_date, date());
        assert_eq!(store.by_student(StudentId::new(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn enroll_uses_current_date() {
        let (coord, _, _, _) = setup(&[1], &[10]);
        let before = Utc::now().date_naive();
        let outcome = coord.enroll(StudentId::new(1), CourseId::new(10)).await.unwrap();
        let after = Utc::now().date_naive();

        let d = outcome.enrollment().enrollment_date;
        assert!(d == before || d == after);
    }

    #[tokio::test]
    async fn second_identical_enroll_reports_already_enrolled() {
        let (coord, store, _, _) = setup(&[1], &[10]);

        let first = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap();
        let second = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap();

        assert!(matches!(second, EnrollOutcome::AlreadyEnrolled(e) if e == *first.enrollment()));
        assert_eq!(second.message(), "Student already enrolled in this course");
        assert_eq!(store.by_course(CourseId::new(10)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_course_is_reported_after_student_check() {
        let (coord, store, students, courses) = setup(&[1], &[]);

        let err = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap_err();

        assert!(matches!(err, CoordinatorError::NotFound(EntityKind::Course)));
        assert_eq!(students.calls(), 1);
        assert_eq!(courses.calls(), 1);
        assert!(store.by_student(StudentId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_peer_fails_closed_by_default() {
        let store = Arc::new(InMemoryEnrollmentStore::new());
        let students = FakeCheck::answering(&[], Existence::Unknown("connection refused".into()));
        let coord = EnrollmentCoordinator::new(store.clone(), students, FakeCheck::with(&[10]));

        let err = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::NotFound(EntityKind::Student)));
    }

    #[tokio::test]
    async fn unreachable_peer_can_be_surfaced() {
        let store = Arc::new(InMemoryEnrollmentStore::new());
        let courses = FakeCheck::answering(&[], Existence::Unknown("status 503".into()));
        let coord = EnrollmentCoordinator::new(store.clone(), FakeCheck::with(&[1]), courses)
            .with_unknown_policy(UnknownPolicy::Propagate);

        let err = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::Unverified { kind: EntityKind::Course, .. }));
        assert!(store.by_course(CourseId::new(10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queries_project_the_other_side_in_store_order() {
        let (coord, _, _, _) = setup(&[1, 2], &[10, 20, 30]);
        for (s, c) in [(1, 30), (2, 10), (1, 10)] {
            coord.enroll_on(StudentId::new(s), CourseId::new(c), date()).await.unwrap();
        }

        assert_eq!(
            coord.courses_for_student(StudentId::new(1)).await.unwrap(),
            vec![CourseId::new(30), CourseId::new(10)]
        );
        assert_eq!(
            coord.students_for_course(CourseId::new(10)).await.unwrap(),
            vec![StudentId::new(2), StudentId::new(1)]
        );
        assert!(coord.courses_for_student(StudentId::new(7)).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_identical_enrollments_converge_to_one_row() {
        let (coord, store, _, _) = setup(&[1], &[10]);
        let coord = Arc::new(coord);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let coord = coord.clone();
                tokio::spawn(async move { coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await })
            })
            .collect();

        let mut created = 0;
        for h in handles {
            if h.await.unwrap().unwrap().is_new() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.by_student(StudentId::new(1)).await.unwrap().len(), 1);
    }

    /// Store whose duplicate check always misses, so races surface at insert.
    struct RacingStore {
        inner: InMemoryEnrollmentStore,
        hide_existing: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl EnrollmentStore for RacingStore {
        async fn insert(&self, new: NewEnrollment) -> Result<Enrollment, StoreError> {
            self.inner.insert(new).await
        }

        async fn find(&self, s: StudentId, c: CourseId) -> Result<Option<Enrollment>, StoreError> {
            if self.hide_existing.swap(false, std::sync::atomic::Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find(s, c).await
        }

        async fn by_student(&self, s: StudentId) -> Result<Vec<Enrollment>, StoreError> {
            self.inner.by_student(s).await
        }

        async fn by_course(&self, c: CourseId) -> Result<Vec<Enrollment>, StoreError> {
            self.inner.by_course(c).await
        }
    }

    #[tokio::test]
    async fn insert_conflict_after_passed_check_reports_already_enrolled() {
        let store = Arc::new(RacingStore {
            inner: InMemoryEnrollmentStore::new(),
            hide_existing: std::sync::atomic::AtomicBool::new(false),
        });
        let coord = EnrollmentCoordinator::new(store.clone(), FakeCheck::with(&[1]), FakeCheck::with(&[10]));

        coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap();
        store.hide_existing.store(true, std::sync::atomic::Ordering::SeqCst);

        let outcome = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap();
        assert!(matches!(outcome, EnrollOutcome::AlreadyEnrolled(_)));
        assert_eq!(store.by_student(StudentId::new(1)).await.unwrap().len(), 1);
    }

    struct BrokenStore;

    #[async_trait]
    impl EnrollmentStore for BrokenStore {
        async fn insert(&self, _new: NewEnrollment) -> Result<Enrollment, StoreError> {
            Err(StoreError::Backend("disk full".into()))
        }

        async fn find(&self, _s: StudentId, _c: CourseId) -> Result<Option<Enrollment>, StoreError> {
            Ok(None)
        }

        async fn by_student(&self, _s: StudentId) -> Result<Vec<Enrollment>, StoreError> {
            Ok(vec![])
        }

        async fn by_course(&self, _c: CourseId) -> Result<Vec<Enrollment>, StoreError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn write_failure_after_validation_is_surfaced() {
        let coord = EnrollmentCoordinator::new(BrokenStore, FakeCheck::with(&[1]), FakeCheck::with(&[10]));
        let err = coord.enroll_on(StudentId::new(1), CourseId::new(10), date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::Persistence(StoreError::Backend(msg)) if msg == "disk full"));
    }

    proptest! {
        #[test]
        fn missing_student_short_circuits(student in 1i64..10_000, course in 1i64..10_000, course_exists: bool) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let known_courses: Vec<i64> = if course_exists { vec![course] } else { vec![] };
            let (coord, store, students, courses) = setup(&[], &known_courses);

            let err = rt
                .block_on(coord.enroll_on(StudentId::new(student), CourseId::new(course), date()))
                .unwrap_err();

            prop_assert!(matches!(err, CoordinatorError::NotFound(EntityKind::Student)));
            prop_assert_eq!(students.calls(), 1);
            prop_assert_eq!(courses.calls(), 0);
            let rows = rt.block_on(store.by_student(StudentId::new(student))).unwrap();
            prop_assert!(rows.is_empty());
        }
    }
}
