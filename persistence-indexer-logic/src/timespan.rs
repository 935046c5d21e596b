//! Hourly, daily and monthly transaction counters.

use std::marker::PhantomData;

use bon::Builder;
use chrono::{DateTime, Utc};
use persistence_indexer_entity::{daily_snapshots, hourly_snapshots, monthly_snapshots};

use crate::{
    error::StoreError,
    store::{
        EntityStore, Record,
        convert::{from_db_i64, from_db_time, to_db_time, to_db_u64},
    },
    types::BlockHeader,
};

pub trait Timespan: Send + Sync + 'static {
    /// Id of the bucket the timestamp falls into. Zero-padded UTC, so ids of
    /// coarser resolutions are prefixes of finer ones.
    fn bucket_id(time: DateTime<Utc>) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hour;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month;

impl Timespan for Hour {
    fn bucket_id(time: DateTime<Utc>) -> String {
        time.format("%Y-%m-%d-%H").to_string()
    }
}

impl Timespan for Day {
    fn bucket_id(time: DateTime<Utc>) -> String {
        time.format("%Y-%m-%d").to_string()
    }
}

impl Timespan for Month {
    fn bucket_id(time: DateTime<Utc>) -> String {
        time.format("%Y-%m").to_string()
    }
}

/// Running transaction count of one bucket of resolution `T`.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Snapshot<T> {
    #[builder(into)]
    pub id: String,
    pub last_block_height: u64,
    pub last_block_time: DateTime<Utc>,
    pub tx_count: u64,
    #[builder(skip)]
    resolution: PhantomData<T>,
}

pub type HourlySnapshot = Snapshot<Hour>;
pub type DailySnapshot = Snapshot<Day>;
pub type MonthlySnapshot = Snapshot<Month>;

macro_rules! impl_snapshot_record {
    ($timespan:ty, $entity:ident) => {
        impl Record for Snapshot<$timespan> {
            type Entity = $entity::Entity;
            type Model = $entity::Model;
            type ActiveModel = $entity::ActiveModel;

            fn id(&self) -> &str {
                &self.id
            }

            fn id_column() -> $entity::Column {
                $entity::Column::Id
            }

            fn from_model(model: Self::Model) -> Result<Self, StoreError> {
                Ok(Self {
                    id: model.id,
                    last_block_height: from_db_i64(model.last_block_height, "last_block_height")?,
                    last_block_time: from_db_time(model.last_block_time),
                    tx_count: from_db_i64(model.tx_count, "tx_count")?,
                    resolution: PhantomData,
                })
            }

            fn into_model(self) -> Result<Self::Model, StoreError> {
                Ok($entity::Model {
                    id: self.id,
                    last_block_height: to_db_u64(self.last_block_height, "last_block_height")?,
                    last_block_time: to_db_time(self.last_block_time),
                    tx_count: to_db_u64(self.tx_count, "tx_count")?,
                })
            }
        }
    };
}

impl_snapshot_record!(Hour, hourly_snapshots);
impl_snapshot_record!(Day, daily_snapshots);
impl_snapshot_record!(Month, monthly_snapshots);

async fn bump<S, T>(store: &S, block: &BlockHeader) -> Result<(), StoreError>
where
    S: EntityStore,
    T: Timespan,
    Snapshot<T>: Record,
{
    let id = T::bucket_id(block.time);
    let snapshot = match store.get::<Snapshot<T>>(&id).await? {
        Some(existing) => Snapshot {
            last_block_height: block.height,
            last_block_time: block.time,
            tx_count: existing.tx_count + 1,
            ..existing
        },
        None => Snapshot::builder()
            .id(id)
            .last_block_height(block.height)
            .last_block_time(block.time)
            .tx_count(1)
            .build(),
    };
    tracing::trace!(
        bucket = %snapshot.id,
        tx_count = snapshot.tx_count,
        "bumping snapshot"
    );
    store.save(snapshot).await
}

/// Counts one transaction of `block` in its hour, day and month buckets.
pub async fn record_transaction<S: EntityStore>(
    store: &S,
    block: &BlockHeader,
) -> Result<(), StoreError> {
    bump::<S, Hour>(store, block).await?;
    bump::<S, Day>(store, block).await?;
    bump::<S, Month>(store, block).await?;
    Ok(())
}
