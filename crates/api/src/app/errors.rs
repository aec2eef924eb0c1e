use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ums_core::DomainError;
use ums_infra::StoreError;
use ums_infra::coordinator::CoordinatorError;

/// Relationship endpoints answer in plain text, CRUD endpoints in JSON.
pub fn coordinator_error_to_response(err: CoordinatorError) -> Response {
    match err {
        CoordinatorError::NotFound(kind) => {
            (StatusCode::NOT_FOUND, format!("{kind} not found")).into_response()
        }
        CoordinatorError::Unverified { kind, .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, format!("{kind} service unavailable")).into_response()
        }
        CoordinatorError::Persistence(e) => {
            tracing::error!(error = %e, "relationship store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "Persistence failure").into_response()
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> Response {
    tracing::error!(error = %err, "entity store failure");
    match err {
        StoreError::Duplicate(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        other => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", other.to_string()),
    }
}

pub fn invalid_id(err: DomainError) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
