//! Single-entity durable storage (one store per owning service).
//!
//! The read-by-id path doubles as the existence contract consumed by peer
//! services: a present row is served as 200, an absent one as 404.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use ums_core::Record;

use crate::error::StoreError;

pub use in_memory::InMemoryEntityStore;
pub use postgres::{PgRecord, PostgresEntityStore};

/// Keyed CRUD storage for one record type.
#[async_trait]
pub trait EntityStore<E: Record>: Send + Sync {
    /// Persist a new record; the store assigns the identifier.
    async fn create(&self, fields: E::Fields) -> Result<E, StoreError>;

    async fn get(&self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// All records, in store order.
    async fn list(&self) -> Result<Vec<E>, StoreError>;

    /// Replace every field of an existing record. `None` if the id is unknown.
    async fn update(&self, id: E::Id, fields: E::Fields) -> Result<Option<E>, StoreError>;

    /// Remove a record. Deleting an absent id is not an error.
    async fn delete(&self, id: E::Id) -> Result<(), StoreError>;

    async fn exists(&self, id: E::Id) -> Result<bool, StoreError> {
        Ok(self.get(id).await?.is_some())
    }
}

#[async_trait]
impl<E, S> EntityStore<E> for Arc<S>
where
    E: Record,
    S: EntityStore<E> + ?Sized,
{
    async fn create(&self, fields: E::Fields) -> Result<E, StoreError> {
        (**self).create(fields).await
    }

    async fn get(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<E>, StoreError> {
        (**self).list().await
    }

    async fn update(&self, id: E::Id, fields: E::Fields) -> Result<Option<E>, StoreError> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        (**self).delete(id).await
    }

    async fn exists(&self, id: E::Id) -> Result<bool, StoreError> {
        (**self).exists(id).await
    }
}
