use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityName, EntityTrait, IntoActiveModel, Iterable,
    PrimaryKeyToColumn, QueryFilter, sea_query::OnConflict,
};

use crate::{
    error::StoreError,
    store::{EntityStore, Record},
};

#[derive(Clone)]
pub struct IndexerDatabase {
    pub db: Arc<DatabaseConnection>,
}

impl IndexerDatabase {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// `ON CONFLICT (id) DO UPDATE` of every non-key column of `R`.
fn upsert_on_id<R: Record>() -> OnConflict {
    let update_columns = <R::Entity as EntityTrait>::Column::iter()
        .filter(|column| <R::Entity as EntityTrait>::PrimaryKey::from_column(*column).is_none());
    OnConflict::column(R::id_column())
        .update_columns(update_columns)
        .to_owned()
}

#[async_trait]
impl EntityStore for IndexerDatabase {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let model = R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(self.db.as_ref())
            .await?;
        model.map(R::from_model).transpose()
    }

    async fn save<R: Record>(&self, record: R) -> Result<(), StoreError> {
        let id = record.id().to_string();
        let active = record.into_model()?.into_active_model();
        R::Entity::insert(active)
            .on_conflict(upsert_on_id::<R>())
            .exec_without_returning(self.db.as_ref())
            .await?;
        tracing::trace!(table = R::Entity::default().table_name(), id = %id, "record saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        records::{Direction, Provenance, TransferCorrelation, User},
        test_utils::init_db,
    };
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use sea_orm::prelude::BigDecimal;

    #[tokio::test]
    #[ignore = "needs database to run"]
    async fn save_is_create_or_update() {
        let guard = init_db("database_save_is_create_or_update").await;
        let db = IndexerDatabase::new(guard.client());
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 5, 10, 0).unwrap();

        assert_eq!(db.get::<User>("addra").await.unwrap(), None);
        for id in ["addra", "addrb"] {
            db.save(User::builder().id(id).first_seen(time).build())
                .await
                .unwrap();
        }

        let mut correlation = TransferCorrelation::builder()
            .id("42")
            .block_height(10)
            .block_time(time)
            .tx_hash("SEND")
            .sender_id("addra")
            .receiver_id("addrb")
            .amount(BigDecimal::from(100))
            .denom("uxprt")
            .direction(Direction::Out)
            .source(Provenance::new("core-1", "SEND"))
            .build();
        db.save(correlation.clone()).await.unwrap();

        correlation.destination = Some(Provenance::new("osmosis-1", "RECV"));
        db.save(correlation.clone()).await.unwrap();

        let stored = db.get::<TransferCorrelation>("42").await.unwrap();
        assert_eq!(stored, Some(correlation));
    }

    #[tokio::test]
    #[ignore = "needs database to run"]
    async fn correlation_requires_known_users() {
        let guard = init_db("database_correlation_requires_known_users").await;
        let db = IndexerDatabase::new(guard.client());
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 5, 10, 0).unwrap();

        let correlation = TransferCorrelation::builder()
            .id("7")
            .block_height(1)
            .block_time(time)
            .tx_hash("HASH")
            .sender_id("unknown")
            .receiver_id("unknown")
            .amount(BigDecimal::from(1))
            .direction(Direction::In)
            .destination(Provenance::new("core-1", "HASH"))
            .build();
        assert!(matches!(
            db.save(correlation).await,
            Err(StoreError::Db(_))
        ));
    }
}
