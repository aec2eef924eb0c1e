//! Postgres-backed relationship stores.
//!
//! `enrollments` carries `UNIQUE (student_id, course_id)`; a concurrent
//! duplicate insert surfaces as `StoreError::Duplicate` via SQLSTATE 23505.
//! `faculty_courses` has no such constraint, so `insert_unique` serializes
//! writers for a pair with a transaction-scoped advisory lock.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use ums_core::{AssignmentId, CourseId, EnrollmentId, FacultyId, StudentId};
use ums_enrollment::{Enrollment, NewEnrollment};
use ums_faculty::{FacultyCourseAssignment, NewAssignment};

use super::{AssignmentStore, EnrollmentStore};
use crate::error::{map_sqlx_error, StoreError};

pub struct PostgresEnrollmentStore {
    pool: PgPool,
}

impl PostgresEnrollmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn enrollment_from_row(row: &PgRow) -> Result<Enrollment, sqlx::Error> {
    Ok(Enrollment {
        id: EnrollmentId::new(row.try_get("id")?),
        student_id: StudentId::new(row.try_get("student_id")?),
        course_id: CourseId::new(row.try_get("course_id")?),
        enrollment_date: row.try_get("enrollment_date")?,
    })
}

fn enrollments_from_rows(operation: &str, rows: Vec<PgRow>) -> Result<Vec<Enrollment>, StoreError> {
    rows.iter()
        .map(enrollment_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| map_sqlx_error(operation, e))
}

#[async_trait]
impl EnrollmentStore for PostgresEnrollmentStore {
    async fn insert(&self, new: NewEnrollment) -> Result<Enrollment, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO enrollments (student_id, course_id, enrollment_date)
            VALUES ($1, $2, $3)
            RETURNING id, student_id, course_id, enrollment_date
            "#,
        )
        .bind(new.student_id.get())
        .bind(new.course_id.get())
        .bind(new.enrollment_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_enrollment", e))?;

        enrollment_from_row(&row).map_err(|e| map_sqlx_error("insert_enrollment", e))
    }

    async fn find(&self, student_id: StudentId, course_id: CourseId) -> Result<Option<Enrollment>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, student_id, course_id, enrollment_date
            FROM enrollments
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id.get())
        .bind(course_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_enrollment", e))?;

        row.map(|r| enrollment_from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error("find_enrollment", e))
    }

    async fn by_student(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, student_id, course_id, enrollment_date
            FROM enrollments
            WHERE student_id = $1
            ORDER BY id
            "#,
        )
        .bind(student_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("enrollments_by_student", e))?;

        enrollments_from_rows("enrollments_by_student", rows)
    }

    async fn by_course(&self, course_id: CourseId) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, student_id, course_id, enrollment_date
            FROM enrollments
            WHERE course_id = $1
            ORDER BY id
            "#,
        )
        .bind(course_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("enrollments_by_course", e))?;

        enrollments_from_rows("enrollments_by_course", rows)
    }
}

pub struct PostgresAssignmentStore {
    pool: PgPool,
}

impl PostgresAssignmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn assignment_from_row(row: &PgRow) -> Result<FacultyCourseAssignment, sqlx::Error> {
    Ok(FacultyCourseAssignment {
        id: AssignmentId::new(row.try_get("id")?),
        faculty_id: FacultyId::new(row.try_get("faculty_id")?),
        course_id: CourseId::new(row.try_get("course_id")?),
    })
}

const INSERT_ASSIGNMENT: &str = r#"
    INSERT INTO faculty_courses (faculty_id, course_id)
    VALUES ($1, $2)
    RETURNING id, faculty_id, course_id
"#;

#[async_trait]
impl AssignmentStore for PostgresAssignmentStore {
    async fn insert(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError> {
        let row = sqlx::query(INSERT_ASSIGNMENT)
            .bind(new.faculty_id.get())
            .bind(new.course_id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_assignment", e))?;

        assignment_from_row(&row).map_err(|e| map_sqlx_error("insert_assignment", e))
    }

    async fn insert_unique(&self, new: NewAssignment) -> Result<FacultyCourseAssignment, StoreError> {
        let op = "insert_unique_assignment";
        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error(op, e))?;

        // Released on commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text || ':' || $2::text, 0))")
            .bind(new.faculty_id.get())
            .bind(new.course_id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(op, e))?;

        let existing = sqlx::query("SELECT 1 FROM faculty_courses WHERE faculty_id = $1 AND course_id = $2 LIMIT 1")
            .bind(new.faculty_id.get())
            .bind(new.course_id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(op, e))?;

        if existing.is_some() {
            tx.rollback().await.map_err(|e| map_sqlx_error(op, e))?;
            return Err(StoreError::Duplicate(format!(
                "assignment (faculty {}, course {})",
                new.faculty_id, new.course_id
            )));
        }

        let row = sqlx::query(INSERT_ASSIGNMENT)
            .bind(new.faculty_id.get())
            .bind(new.course_id.get())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(op, e))?;
        let assignment = assignment_from_row(&row).map_err(|e| map_sqlx_error(op, e))?;

        tx.commit().await.map_err(|e| map_sqlx_error(op, e))?;
        Ok(assignment)
    }

    async fn find(
        &self,
        faculty_id: FacultyId,
        course_id: CourseId,
    ) -> Result<Option<FacultyCourseAssignment>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, faculty_id, course_id
            FROM faculty_courses
            WHERE faculty_id = $1 AND course_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(faculty_id.get())
        .bind(course_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_assignment", e))?;

        row.map(|r| assignment_from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error("find_assignment", e))
    }

    async fn by_faculty(&self, faculty_id: FacultyId) -> Result<Vec<FacultyCourseAssignment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, faculty_id, course_id
            FROM faculty_courses
            WHERE faculty_id = $1
            ORDER BY id
            "#,
        )
        .bind(faculty_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("assignments_by_faculty", e))?;

        rows.iter()
            .map(assignment_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("assignments_by_faculty", e))
    }
}
