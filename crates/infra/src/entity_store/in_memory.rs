use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use ums_core::Record;

use super::EntityStore;
use crate::error::StoreError;

#[derive(Debug)]
struct Table<E> {
    next_id: i64,
    rows: BTreeMap<i64, E>,
}

/// In-memory entity store.
///
/// Intended for tests/dev. Ids are assigned from a per-store sequence starting
/// at 1, so store order (ascending id) is creation order.
#[derive(Debug)]
pub struct InMemoryEntityStore<E> {
    inner: RwLock<Table<E>>,
}

impl<E> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Record> EntityStore<E> for InMemoryEntityStore<E> {
    async fn create(&self, fields: E::Fields) -> Result<E, StoreError> {
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = table.next_id;
        table.next_id += 1;

        let record = E::from_fields(E::Id::from(id), fields);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let key: i64 = id.into();
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.get(&key).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, StoreError> {
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, id: E::Id, fields: E::Fields) -> Result<Option<E>, StoreError> {
        let key: i64 = id.into();
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.get_mut(&key).map(|record| {
            record.replace_fields(fields);
            record.clone()
        }))
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        let key: i64 = id.into();
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        table.rows.remove(&key);
        Ok(())
    }
}
