//! CRUD routes shared by the student, course, and faculty services.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};

use ums_core::{DomainError, Entity, Record};

use crate::app::errors::{invalid_id, json_error, store_error_to_response};
use crate::app::services::DynStore;

/// A record type that can be served over HTTP.
pub trait Resource:
    Record<Fields: DeserializeOwned> + Entity<Id: FromStr<Err = DomainError>> + Serialize
{
}

impl<E> Resource for E where
    E: Record<Fields: DeserializeOwned> + Entity<Id: FromStr<Err = DomainError>> + Serialize
{
}

pub fn router<E: Resource>() -> Router {
    Router::new()
        .route("/", post(create::<E>).get(list::<E>))
        .route("/:id", get(get_one::<E>).put(replace::<E>).delete(remove::<E>))
}

async fn create<E: Resource>(
    Extension(store): Extension<DynStore<E>>,
    Json(fields): Json<E::Fields>,
) -> Response {
    match store.create(fields).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => store_error_to_response(e),
    }
}

async fn list<E: Resource>(Extension(store): Extension<DynStore<E>>) -> Response {
    match store.list().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => store_error_to_response(e),
    }
}

async fn get_one<E: Resource>(
    Extension(store): Extension<DynStore<E>>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<E::Id>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match store.get(id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found::<E>(),
        Err(e) => store_error_to_response(e),
    }
}

async fn replace<E: Resource>(
    Extension(store): Extension<DynStore<E>>,
    Path(id): Path<String>,
    Json(fields): Json<E::Fields>,
) -> Response {
    let id = match id.parse::<E::Id>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match store.update(id, fields).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found::<E>(),
        Err(e) => store_error_to_response(e),
    }
}

async fn remove<E: Resource>(
    Extension(store): Extension<DynStore<E>>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<E::Id>() {
        Ok(id) => id,
        Err(e) => return invalid_id(e),
    };

    match store.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_to_response(e),
    }
}

fn not_found<E: Resource>() -> Response {
    json_error(
        StatusCode::NOT_FOUND,
        "not_found",
        DomainError::not_found(E::KIND).to_string(),
    )
}
