//! Postgres-backed entity stores.
//!
//! One generic store drives every record type; the per-type table layout is
//! described by `PgRecord`. Statements are rendered once at construction.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use ums_core::{CourseId, FacultyId, Record, StudentId};
use ums_courses::{Course, CourseFields};
use ums_faculty::{Faculty, FacultyFields};
use ums_students::{Student, StudentFields};

use super::EntityStore;
use crate::error::{map_sqlx_error, StoreError};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Table mapping for a record stored in Postgres.
///
/// Every table has a `BIGSERIAL id` primary key followed by `COLUMNS`.
pub trait PgRecord: Record {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Bind the field values in `COLUMNS` order.
    fn bind_fields(query: PgQuery<'_>, fields: Self::Fields) -> PgQuery<'_>;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

#[derive(Debug)]
struct Statements {
    insert: String,
    select_one: String,
    select_all: String,
    update: String,
    delete: String,
}

impl Statements {
    fn render(table: &str, columns: &[&str]) -> Self {
        let cols = columns.join(", ");
        let returning = format!("id, {cols}");
        let placeholders = (1..=columns.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ${}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            insert: format!("INSERT INTO {table} ({cols}) VALUES ({placeholders}) RETURNING {returning}"),
            select_one: format!("SELECT {returning} FROM {table} WHERE id = $1"),
            select_all: format!("SELECT {returning} FROM {table} ORDER BY id"),
            update: format!("UPDATE {table} SET {assignments} WHERE id = $1 RETURNING {returning}"),
            delete: format!("DELETE FROM {table} WHERE id = $1"),
        }
    }
}

/// Postgres-backed entity store for any `PgRecord`.
pub struct PostgresEntityStore<E> {
    pool: PgPool,
    sql: Statements,
    _record: PhantomData<fn() -> E>,
}

impl<E: PgRecord> PostgresEntityStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            sql: Statements::render(E::TABLE, E::COLUMNS),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<E: PgRecord> EntityStore<E> for PostgresEntityStore<E> {
    async fn create(&self, fields: E::Fields) -> Result<E, StoreError> {
        let row = E::bind_fields(sqlx::query(&self.sql.insert), fields)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(E::TABLE, e))?;
        E::from_row(&row).map_err(|e| map_sqlx_error(E::TABLE, e))
    }

    async fn get(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let key: i64 = id.into();
        let row = sqlx::query(&self.sql.select_one)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(E::TABLE, e))?;
        row.map(|r| E::from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error(E::TABLE, e))
    }

    async fn list(&self) -> Result<Vec<E>, StoreError> {
        let rows = sqlx::query(&self.sql.select_all)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(E::TABLE, e))?;
        rows.iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error(E::TABLE, e))
    }

    async fn update(&self, id: E::Id, fields: E::Fields) -> Result<Option<E>, StoreError> {
        let key: i64 = id.into();
        let row = E::bind_fields(sqlx::query(&self.sql.update).bind(key), fields)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(E::TABLE, e))?;
        row.map(|r| E::from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error(E::TABLE, e))
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        let key: i64 = id.into();
        sqlx::query(&self.sql.delete)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(E::TABLE, e))?;
        Ok(())
    }
}

impl PgRecord for Student {
    const TABLE: &'static str = "students";
    const COLUMNS: &'static [&'static str] = &["name", "email", "department", "year"];

    fn bind_fields(query: PgQuery<'_>, f: StudentFields) -> PgQuery<'_> {
        query.bind(f.name).bind(f.email).bind(f.department).bind(f.year)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Student {
            id: StudentId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            department: row.try_get("department")?,
            year: row.try_get("year")?,
        })
    }
}

impl PgRecord for Course {
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static [&'static str] = &["name", "code", "department", "credits", "semester"];

    fn bind_fields(query: PgQuery<'_>, f: CourseFields) -> PgQuery<'_> {
        query
            .bind(f.name)
            .bind(f.code)
            .bind(f.department)
            .bind(f.credits)
            .bind(f.semester)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Course {
            id: CourseId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            department: row.try_get("department")?,
            credits: row.try_get("credits")?,
            semester: row.try_get("semester")?,
        })
    }
}

impl PgRecord for Faculty {
    const TABLE: &'static str = "faculty";
    const COLUMNS: &'static [&'static str] = &["name", "email", "department", "designation"];

    fn bind_fields(query: PgQuery<'_>, f: FacultyFields) -> PgQuery<'_> {
        query
            .bind(f.name)
            .bind(f.email)
            .bind(f.department)
            .bind(f.designation)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Faculty {
            id: FacultyId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            department: row.try_get("department")?,
            designation: row.try_get("designation")?,
        })
    }
}
