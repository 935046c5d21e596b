use std::sync::Arc;

use blockscout_service_launcher::database;
use migration::Migrator;

use crate::{database::IndexerDatabase, indexer::Indexer, settings::Settings};

const SERVICE_NAME: &str = "persistence_indexer";

/// Initializes logging, connects to (and migrates) the database and returns
/// an indexer ready to receive decoded blocks.
pub async fn init_indexer(settings: Settings) -> anyhow::Result<Indexer<IndexerDatabase>> {
    blockscout_service_launcher::tracing::init_logs(
        SERVICE_NAME,
        &settings.tracing,
        &settings.jaeger,
    )?;
    settings.indexer.validate()?;

    let db_connection =
        Arc::new(database::initialize_postgres::<Migrator>(&settings.database).await?);
    let db = IndexerDatabase::new(db_connection);

    tracing::info!(
        start_block = settings.indexer.start_block,
        include_failed_tx = settings.indexer.include_failed_tx,
        handlers = settings.indexer.handlers.len(),
        "indexer initialized"
    );
    Ok(Indexer::new(db, settings.indexer))
}
