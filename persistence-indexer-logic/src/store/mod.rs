//! Narrow key/value view of the entity store used by every handler.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel,
    ModelTrait,
};

use crate::error::StoreError;

/// A domain record persisted as one row of `Entity`, keyed by a string id.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Clone
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send;

    fn id(&self) -> &str;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn from_model(model: Self::Model) -> Result<Self, StoreError>;

    fn into_model(self) -> Result<Self::Model, StoreError>;
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError>;

    /// Create-or-update by id. Every non-key field of the stored row is
    /// replaced with the record's value.
    async fn save<R: Record>(&self, record: R) -> Result<(), StoreError>;
}

/// Conversions between domain values and their column representation.
pub(crate) mod convert {
    use chrono::{DateTime, NaiveDateTime, Utc};

    use crate::error::StoreError;

    pub fn to_db_u64(value: u64, field: &str) -> Result<i64, StoreError> {
        i64::try_from(value)
            .map_err(|_| StoreError::Conversion(format!("{field} {value} does not fit into bigint")))
    }

    pub fn from_db_i64(value: i64, field: &str) -> Result<u64, StoreError> {
        u64::try_from(value)
            .map_err(|_| StoreError::Conversion(format!("{field} {value} is negative")))
    }

    pub fn to_db_time(time: DateTime<Utc>) -> NaiveDateTime {
        time.naive_utc()
    }

    pub fn from_db_time(time: NaiveDateTime) -> DateTime<Utc> {
        time.and_utc()
    }
}
