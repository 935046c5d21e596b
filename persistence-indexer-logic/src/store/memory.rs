use std::any::{Any, TypeId};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{EntityStore, Record};
use crate::error::StoreError;

type Key = (TypeId, String);

/// In-process store. Records are kept in their row form, so every save and
/// get goes through the same conversions as the database store.
#[derive(Default)]
pub struct MemoryStore {
    rows: DashMap<Key, Box<dyn Any + Send + Sync>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key<R: Record>(id: &str) -> Key {
        (TypeId::of::<R>(), id.to_string())
    }

    /// Every stored record of type `R`, ordered by id.
    pub fn all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let type_id = TypeId::of::<R>();
        let mut records = self
            .rows
            .iter()
            .filter(|entry| entry.key().0 == type_id)
            .filter_map(|entry| entry.value().downcast_ref::<R::Model>().cloned())
            .map(R::from_model)
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }

    pub fn len<R: Record>(&self) -> usize {
        let type_id = TypeId::of::<R>();
        self.rows
            .iter()
            .filter(|entry| entry.key().0 == type_id)
            .count()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let model = self
            .rows
            .get(&Self::key::<R>(id))
            .and_then(|row| row.value().downcast_ref::<R::Model>().cloned());
        model.map(R::from_model).transpose()
    }

    async fn save<R: Record>(&self, record: R) -> Result<(), StoreError> {
        let key = Self::key::<R>(record.id());
        let model = record.into_model()?;
        self.rows.insert(key, Box::new(model));
        Ok(())
    }
}
