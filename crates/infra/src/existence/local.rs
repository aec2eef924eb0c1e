//! Existence answered by a co-located entity store (no network hop).

use std::marker::PhantomData;

use async_trait::async_trait;
use ums_core::Record;

use super::{Existence, ExistenceCheck};
use crate::entity_store::EntityStore;

pub struct StoreExistence<S, E> {
    store: S,
    _record: PhantomData<fn() -> E>,
}

impl<S, E> StoreExistence<S, E> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<S, E> ExistenceCheck<E::Id> for StoreExistence<S, E>
where
    E: Record,
    S: EntityStore<E>,
{
    async fn check(&self, id: E::Id) -> Existence {
        match self.store.exists(id).await {
            Ok(true) => Existence::Exists,
            Ok(false) => Existence::Absent,
            Err(e) => Existence::Unknown(e.to_string()),
        }
    }
}
