//! Postgres connection and schema bootstrap.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::ServiceKind;

const STUDENTS: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    department TEXT NOT NULL,
    year INTEGER NOT NULL
)"#;

const COURSES: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    department TEXT NOT NULL,
    credits INTEGER NOT NULL,
    semester TEXT NOT NULL
)"#;

const FACULTY: &str = r#"
CREATE TABLE IF NOT EXISTS faculty (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    department TEXT NOT NULL,
    designation TEXT NOT NULL
)"#;

// No uniqueness on (faculty_id, course_id): repeated assignments are rows.
const FACULTY_COURSES: &str = r#"
CREATE TABLE IF NOT EXISTS faculty_courses (
    id BIGSERIAL PRIMARY KEY,
    faculty_id BIGINT NOT NULL,
    course_id BIGINT NOT NULL
)"#;

const FACULTY_COURSES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS faculty_courses_faculty_idx ON faculty_courses (faculty_id, id)";

const ENROLLMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS enrollments (
    id BIGSERIAL PRIMARY KEY,
    student_id BIGINT NOT NULL,
    course_id BIGINT NOT NULL,
    enrollment_date DATE NOT NULL,
    CONSTRAINT enrollments_student_course_key UNIQUE (student_id, course_id)
)"#;

const ENROLLMENTS_COURSE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS enrollments_course_idx ON enrollments (course_id, id)";

/// DDL owned by each service, in execution order.
pub fn schema_for(service: ServiceKind) -> &'static [&'static str] {
    match service {
        ServiceKind::Student => &[STUDENTS],
        ServiceKind::Course => &[COURSES],
        ServiceKind::Faculty => &[FACULTY, FACULTY_COURSES, FACULTY_COURSES_INDEX],
        ServiceKind::Enrollment => &[ENROLLMENTS, ENROLLMENTS_COURSE_INDEX],
    }
}

/// Connect and log whether the database answered.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await;

    match pool {
        Ok(pool) => {
            sqlx::query("SELECT 1").execute(&pool).await?;
            tracing::info!("database connected");
            Ok(pool)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            Err(e)
        }
    }
}

/// Create the tables this service owns, if missing.
pub async fn ensure_schema(pool: &PgPool, service: ServiceKind) -> Result<(), sqlx::Error> {
    for ddl in schema_for(service) {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(service = service.as_str(), "schema ready");
    Ok(())
}
