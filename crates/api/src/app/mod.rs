//! HTTP application wiring.
//!
//! - `services.rs`: store/coordinator wiring for the configured service
//! - `routes/`: handlers, one file per resource area
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use ums_courses::Course;
use ums_faculty::Faculty;
use ums_infra::config::ServiceConfig;
use ums_students::Student;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the router for the configured service (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ServiceConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(router_for(services))
}

/// Mount the routes owned by one service, plus `/health` and request tracing.
pub fn router_for(services: AppServices) -> Router {
    let api = match services {
        AppServices::Student { students } => Router::new()
            .nest("/students", routes::records::router::<Student>())
            .layer(Extension(students)),
        AppServices::Course { courses } => Router::new()
            .nest("/courses", routes::records::router::<Course>())
            .layer(Extension(courses)),
        AppServices::Faculty {
            faculty,
            assignments,
        } => Router::new()
            .nest(
                "/faculty",
                routes::records::router::<Faculty>().merge(routes::faculty::router()),
            )
            .layer(Extension(faculty))
            .layer(Extension(assignments)),
        AppServices::Enrollment { enrollments } => Router::new()
            .nest("/enrollment", routes::enrollment::router())
            .layer(Extension(enrollments)),
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)))
}
