use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use ums_core::{CourseId, FacultyId};

use crate::app::errors::{coordinator_error_to_response, invalid_id};
use crate::app::routes::enrollment::OUTCOME_HEADER;
use crate::app::services::AssignmentService;

/// Assignment routes; merged with the faculty CRUD router, so the faculty
/// segment is named `id` there too.
pub fn router() -> Router {
    Router::new()
        .route("/:id/assign-course/:course_id", post(assign_course))
        .route("/:id/courses", get(courses_for_faculty))
}

async fn assign_course(
    Extension(assignments): Extension<Arc<AssignmentService>>,
    Path((faculty_id, course_id)): Path<(String, String)>,
) -> Response {
    let faculty_id = match faculty_id.parse::<FacultyId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };
    let course_id = match course_id.parse::<CourseId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match assignments.assign_course(faculty_id, course_id).await {
        Ok(outcome) => {
            let label = if outcome.is_new() { "created" } else { "already_exists" };
            tracing::info!(%faculty_id, %course_id, outcome = label, "assign course");
            (StatusCode::OK, [(OUTCOME_HEADER, label)], outcome.message()).into_response()
        }
        Err(e) => coordinator_error_to_response(e),
    }
}

async fn courses_for_faculty(
    Extension(assignments): Extension<Arc<AssignmentService>>,
    Path(faculty_id): Path<String>,
) -> Response {
    let faculty_id = match faculty_id.parse::<FacultyId>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match assignments.courses_for_faculty(faculty_id).await {
        Ok(ids) => Json(ids).into_response(),
        Err(e) => coordinator_error_to_response(e),
    }
}
