use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use ums_courses::Course;
use ums_faculty::Faculty;
use ums_infra::config::{ServiceConfig, ServiceKind};
use ums_infra::coordinator::{AssignmentCoordinator, EnrollmentCoordinator};
use ums_infra::db;
use ums_infra::entity_store::{EntityStore, InMemoryEntityStore, PgRecord, PostgresEntityStore};
use ums_infra::existence::{HttpExistenceClient, StoreExistence};
use ums_infra::relationship_store::{
    AssignmentStore, EnrollmentStore, InMemoryAssignmentStore, InMemoryEnrollmentStore,
    PostgresAssignmentStore, PostgresEnrollmentStore,
};
use ums_students::Student;

pub type DynStore<E> = Arc<dyn EntityStore<E>>;

pub type EnrollmentService =
    EnrollmentCoordinator<Arc<dyn EnrollmentStore>, HttpExistenceClient, HttpExistenceClient>;

pub type AssignmentService = AssignmentCoordinator<
    Arc<dyn AssignmentStore>,
    StoreExistence<DynStore<Faculty>, Faculty>,
    HttpExistenceClient,
>;

/// Everything one service process needs to answer its routes.
pub enum AppServices {
    Student {
        students: DynStore<Student>,
    },
    Course {
        courses: DynStore<Course>,
    },
    Faculty {
        faculty: DynStore<Faculty>,
        assignments: Arc<AssignmentService>,
    },
    Enrollment {
        enrollments: Arc<EnrollmentService>,
    },
}

enum Backend {
    InMemory,
    Postgres(PgPool),
}

impl Backend {
    fn entity_store<E: PgRecord>(&self) -> DynStore<E> {
        match self {
            Backend::InMemory => Arc::new(InMemoryEntityStore::<E>::new()),
            Backend::Postgres(pool) => Arc::new(PostgresEntityStore::<E>::new(pool.clone())),
        }
    }

    fn enrollment_store(&self) -> Arc<dyn EnrollmentStore> {
        match self {
            Backend::InMemory => Arc::new(InMemoryEnrollmentStore::new()),
            Backend::Postgres(pool) => Arc::new(PostgresEnrollmentStore::new(pool.clone())),
        }
    }

    fn assignment_store(&self) -> Arc<dyn AssignmentStore> {
        match self {
            Backend::InMemory => Arc::new(InMemoryAssignmentStore::new()),
            Backend::Postgres(pool) => Arc::new(PostgresAssignmentStore::new(pool.clone())),
        }
    }
}

/// Build stores and coordinators for `config.service`.
///
/// With `DATABASE_URL` set, startup fails unless the database answers and
/// the service's tables can be created.
pub async fn build_services(config: &ServiceConfig) -> anyhow::Result<AppServices> {
    let backend = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url).await.context("database unreachable")?;
            db::ensure_schema(&pool, config.service)
                .await
                .context("failed to create schema")?;
            Backend::Postgres(pool)
        }
        None => {
            tracing::info!(service = config.service.as_str(), "DATABASE_URL not set, using in-memory stores");
            Backend::InMemory
        }
    };

    let services = match config.service {
        ServiceKind::Student => AppServices::Student {
            students: backend.entity_store::<Student>(),
        },
        ServiceKind::Course => AppServices::Course {
            courses: backend.entity_store::<Course>(),
        },
        ServiceKind::Faculty => {
            let faculty = backend.entity_store::<Faculty>();
            let courses = HttpExistenceClient::courses(reqwest::Client::new(), &config.course_service_url);
            let assignments = AssignmentCoordinator::new(
                backend.assignment_store(),
                StoreExistence::new(faculty.clone()),
                courses,
            )
            .with_duplicate_policy(config.duplicate_policy)
            .with_unknown_policy(config.unknown_policy);

            AppServices::Faculty {
                faculty,
                assignments: Arc::new(assignments),
            }
        }
        ServiceKind::Enrollment => {
            let http = reqwest::Client::new();
            let enrollments = EnrollmentCoordinator::new(
                backend.enrollment_store(),
                HttpExistenceClient::students(http.clone(), &config.student_service_url),
                HttpExistenceClient::courses(http, &config.course_service_url),
            )
            .with_unknown_policy(config.unknown_policy);

            AppServices::Enrollment {
                enrollments: Arc::new(enrollments),
            }
        }
    };

    Ok(services)
}
