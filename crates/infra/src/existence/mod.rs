//! Point-in-time existence checks against an entity's owning service.
//!
//! A check never fails; it answers `Exists`, `Absent`, or `Unknown` when the
//! owner could not give a definite answer. What to do with `Unknown` is the
//! caller's choice (`UnknownPolicy`).

pub mod http;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;

pub use http::HttpExistenceClient;
pub use local::StoreExistence;

/// Outcome of an existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Exists,
    Absent,
    /// The owner could not be asked or gave no definite answer.
    Unknown(String),
}

impl Existence {
    pub fn exists(&self) -> bool {
        matches!(self, Existence::Exists)
    }
}

/// How coordinators treat `Existence::Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Fail closed: report the entity as not found.
    #[default]
    TreatAsAbsent,
    /// Report that existence could not be verified.
    Propagate,
}

#[async_trait]
pub trait ExistenceCheck<Id: Send + 'static>: Send + Sync {
    async fn check(&self, id: Id) -> Existence;
}

#[async_trait]
impl<Id, T> ExistenceCheck<Id> for Arc<T>
where
    Id: Send + 'static,
    T: ExistenceCheck<Id> + ?Sized,
{
    async fn check(&self, id: Id) -> Existence {
        (**self).check(id).await
    }
}
