use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use ums_core::{CourseId, StudentId};
use ums_enrollment::EnrollOutcome;

use crate::app::errors::{coordinator_error_to_response, invalid_id};
use crate::app::services::EnrollmentService;

/// Distinguishes a fresh write from an existing row; the body text is the same
/// either way for a given outcome.
pub const OUTCOME_HEADER: &str = "x-ums-outcome";

pub fn router() -> Router {
    Router::new()
        .route("/:student_id/course/:course_id", post(enroll))
        .route("/student/:student_id", get(courses_for_student))
        .route("/course/:course_id", get(students_for_course))
}

async fn enroll(
    Extension(enrollments): Extension<Arc<EnrollmentService>>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> Response {
    let student_id = match student_id.parse::<StudentId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };
    let course_id = match course_id.parse::<CourseId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match enrollments.enroll(student_id, course_id).await {
        Ok(outcome) => {
            let label = match &outcome {
                EnrollOutcome::Created(_) => "created",
                EnrollOutcome::AlreadyEnrolled(_) => "already_exists",
            };
            tracing::info!(%student_id, %course_id, outcome = label, "enroll");
            (StatusCode::OK, [(OUTCOME_HEADER, label)], outcome.message()).into_response()
        }
        Err(e) => coordinator_error_to_response(e),
    }
}

async fn courses_for_student(
    Extension(enrollments): Extension<Arc<EnrollmentService>>,
    Path(student_id): Path<String>,
) -> Response {
    let student_id = match student_id.parse::<StudentId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match enrollments.courses_for_student(student_id).await {
        Ok(ids) => Json(ids).into_response(),
        Err(e) => coordinator_error_to_response(e),
    }
}

async fn students_for_course(
    Extension(enrollments): Extension<Arc<EnrollmentService>>,
    Path(course_id): Path<String>,
) -> Response {
    let course_id = match course_id.parse::<CourseId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match enrollments.students_for_course(course_id).await {
        Ok(ids) => Json(ids).into_response(),
        Err(e) => coordinator_error_to_response(e),
    }
}
