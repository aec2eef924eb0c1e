//! Integration tests for the cross-service protocol.
//!
//! Tests: peer read endpoint → HttpExistenceClient → Coordinator → RelationshipStore
//!
//! Verifies:
//! - Existence is decided by the peer's status code only
//! - A peer going away turns checks into "not found" (fail closed)
//! - Deleting a referenced entity leaves existing rows untouched

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::Path, http::StatusCode, routing::get, Extension, Router};
    use chrono::NaiveDate;

    use ums_core::{CourseId, EntityKind, StudentId};
    use ums_courses::{Course, CourseFields};
    use ums_students::{Student, StudentFields};

    use crate::coordinator::{CoordinatorError, EnrollmentCoordinator};
    use crate::entity_store::{EntityStore, InMemoryEntityStore};
    use crate::existence::{HttpExistenceClient, UnknownPolicy};
    use crate::relationship_store::InMemoryEnrollmentStore;

    struct Peer {
        base_url: String,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Drop for Peer {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    async fn read_student(
        Extension(store): Extension<Arc<InMemoryEntityStore<Student>>>,
        Path(id): Path<i64>,
    ) -> StatusCode {
        match store.get(StudentId::new(id)).await {
            Ok(Some(_)) => StatusCode::OK,
            Ok(None) => StatusCode::NOT_FOUND,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    async fn read_course(
        Extension(store): Extension<Arc<InMemoryEntityStore<Course>>>,
        Path(id): Path<i64>,
    ) -> StatusCode {
        match store.get(CourseId::new(id)).await {
            Ok(Some(_)) => StatusCode::OK,
            Ok(None) => StatusCode::NOT_FOUND,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    async fn spawn(app: Router) -> Peer {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Peer { base_url, handle }
    }

    struct World {
        students: Arc<InMemoryEntityStore<Student>>,
        courses: Arc<InMemoryEntityStore<Course>>,
        student_peer: Peer,
        course_peer: Peer,
    }

    async fn world() -> World {
        let students = Arc::new(InMemoryEntityStore::<Student>::new());
        let courses = Arc::new(InMemoryEntityStore::<Course>::new());

        let student_peer = spawn(
            Router::new()
                .route("/students/:id", get(read_student))
                .layer(Extension(students.clone())),
        )
        .await;
        let course_peer = spawn(
            Router::new()
                .route("/courses/:id", get(read_course))
                .layer(Extension(courses.clone())),
        )
        .await;

        World {
            students,
            courses,
            student_peer,
            course_peer,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    async fn seed(w: &World) -> (StudentId, CourseId) {
        let s = w
            .students
            .create(StudentFields {
                name: "Lovelace".into(),
                email: "ada@uni.test".into(),
                department: "Mathematics".into(),
                year: 2,
            })
            .await
            .unwrap();
        let c = w
            .courses
            .create(CourseFields {
                name: "Analytical Engines".into(),
                code: "CS101".into(),
                department: "CS".into(),
                credits: 3,
                semester: "Fall".into(),
            })
            .await
            .unwrap();
        (s.id, c.id)
    }

    #[tokio::test]
    async fn enrollment_over_http_checks() {
        let w = world().await;
        let (sid, cid) = seed(&w).await;

        let http = reqwest::Client::new();
        let store = Arc::new(InMemoryEnrollmentStore::new());
        let coord = EnrollmentCoordinator::new(
            store.clone(),
            HttpExistenceClient::students(http.clone(), &w.student_peer.base_url),
            HttpExistenceClient::courses(http, &w.course_peer.base_url),
        );

        let created = coord.enroll_on(sid, cid, date()).await.unwrap();
        assert!(created.is_new());

        let again = coord.enroll_on(sid, cid, date()).await.unwrap();
        assert!(!again.is_new());

        let err = coord.enroll_on(StudentId::new(99), cid, date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::NotFound(EntityKind::Student)));

        assert_eq!(coord.courses_for_student(sid).await.unwrap(), vec![cid]);
    }

    #[tokio::test]
    async fn peer_outage_fails_closed_or_surfaces() {
        let w = world().await;
        let (sid, cid) = seed(&w).await;
        let course_url = w.course_peer.base_url.clone();
        drop(w.course_peer);
        // Give the aborted server task a moment to release the socket.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let http = reqwest::Client::new();
        let closed = EnrollmentCoordinator::new(
            Arc::new(InMemoryEnrollmentStore::new()),
            HttpExistenceClient::students(http.clone(), &w.student_peer.base_url),
            HttpExistenceClient::courses(http.clone(), &course_url),
        );
        let err = closed.enroll_on(sid, cid, date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::NotFound(EntityKind::Course)));

        let surfaced = EnrollmentCoordinator::new(
            Arc::new(InMemoryEnrollmentStore::new()),
            HttpExistenceClient::students(http.clone(), &w.student_peer.base_url),
            HttpExistenceClient::courses(http, &course_url),
        )
        .with_unknown_policy(UnknownPolicy::Propagate);
        let err = surfaced.enroll_on(sid, cid, date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::Unverified { kind: EntityKind::Course, .. }));
    }

    #[tokio::test]
    async fn deleting_a_student_leaves_a_dangling_enrollment() {
        let w = world().await;
        let (sid, cid) = seed(&w).await;

        let http = reqwest::Client::new();
        let coord = EnrollmentCoordinator::new(
            Arc::new(InMemoryEnrollmentStore::new()),
            HttpExistenceClient::students(http.clone(), &w.student_peer.base_url),
            HttpExistenceClient::courses(http, &w.course_peer.base_url),
        );
        coord.enroll_on(sid, cid, date()).await.unwrap();

        w.students.delete(sid).await.unwrap();

        assert_eq!(coord.students_for_course(cid).await.unwrap(), vec![sid]);
        let err = coord.enroll_on(sid, cid, date()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::NotFound(EntityKind::Student)));
    }
}
