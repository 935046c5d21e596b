pub mod attributes;
pub mod bootstrap;
pub mod correlation;
pub mod database;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod indexer;
pub mod metrics;
pub mod records;
pub mod registry;
pub mod settings;
pub mod store;
pub mod timespan;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use bootstrap::init_indexer;
pub use database::IndexerDatabase;
pub use error::{IndexError, StoreError};
pub use indexer::{BlockSummary, Indexer, TxStatus};
pub use settings::{IndexerSettings, Settings};
pub use store::{EntityStore, MemoryStore, Record};
