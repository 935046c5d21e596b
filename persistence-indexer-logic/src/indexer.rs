use tracing::instrument;

use crate::{
    error::IndexError,
    handlers::{self, Outcome, SkipReason},
    metrics,
    records::Direction,
    settings::{HandlerKind, IndexerSettings},
    store::EntityStore,
    types::{DecodedBlock, DecodedTransaction, EventContext, TransactionContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Processed,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Routes decoded events and transactions of one chain to their handlers.
///
/// Processing is strictly sequential: every call runs to completion, store
/// writes included, before the next one should start.
pub struct Indexer<S> {
    store: S,
    settings: IndexerSettings,
}

impl<S: EntityStore> Indexer<S> {
    pub fn new(store: S, settings: IndexerSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    pub fn route(&self, ctx: &EventContext<'_>) -> Option<HandlerKind> {
        self.settings.route(&ctx.event.kind, ctx.message_type())
    }

    /// Handles one event. Returns `None` if no handler is configured for it.
    ///
    /// A malformed payload only skips the event; any other error is returned.
    pub async fn handle_event(
        &self,
        ctx: &EventContext<'_>,
    ) -> Result<Option<Outcome>, IndexError> {
        let Some(handler) = self.route(ctx) else {
            return Ok(None);
        };
        self.run_handler(handler, ctx).await.map(Some)
    }

    #[instrument(
        name = "handle_event",
        skip_all,
        fields(
            height = ctx.block.height,
            tx_hash = %ctx.tx_hash,
            event_idx = ctx.idx,
            event = %ctx.event.kind,
            handler = %handler,
        )
    )]
    async fn run_handler(
        &self,
        handler: HandlerKind,
        ctx: &EventContext<'_>,
    ) -> Result<Outcome, IndexError> {
        let result = match handler {
            HandlerKind::DelegatorReward => {
                handlers::handle_delegator_reward(&self.store, ctx).await
            }
            HandlerKind::IbcReceive => handlers::handle_ibc(&self.store, ctx, Direction::In).await,
            HandlerKind::IbcSend => handlers::handle_ibc(&self.store, ctx, Direction::Out).await,
            HandlerKind::Transfer => handlers::handle_transfer(&self.store, ctx).await,
        };

        let outcome = match result {
            Err(err @ IndexError::MalformedPayload { .. }) => {
                tracing::warn!(err = %err, "skipping event with malformed payload");
                Outcome::Skipped(SkipReason::MalformedPayload)
            }
            other => other?,
        };

        match outcome {
            Outcome::Handled => metrics::HANDLED_EVENTS_TOTAL
                .with_label_values(&[handler.as_ref()])
                .inc(),
            Outcome::Skipped(reason) => metrics::SKIPPED_EVENTS_TOTAL
                .with_label_values(&[handler.as_ref(), reason.as_ref()])
                .inc(),
        }
        Ok(outcome)
    }

    #[instrument(
        skip_all,
        fields(height = ctx.block.height, tx_hash = %ctx.tx.hash, handler = "transaction")
    )]
    pub async fn handle_transaction(&self, ctx: &TransactionContext<'_>) -> Result<(), IndexError> {
        handlers::handle_transaction(&self.store, ctx).await
    }

    /// Every routed event of the transaction in emission order, then the
    /// transaction itself. Failed transactions are skipped unless configured
    /// otherwise.
    pub async fn process_transaction(
        &self,
        block: &DecodedBlock,
        tx: &DecodedTransaction,
    ) -> Result<TxStatus, IndexError> {
        if !tx.is_successful() && !self.settings.include_failed_tx {
            tracing::debug!(
                height = block.header.height,
                tx_hash = %tx.hash,
                code = tx.code,
                "skipping failed transaction"
            );
            return Ok(TxStatus::Skipped);
        }

        for ctx in tx.event_contexts(&block.header) {
            self.handle_event(&ctx).await?;
        }
        self.handle_transaction(&TransactionContext::new(&block.header, tx))
            .await?;
        Ok(TxStatus::Processed)
    }

    /// Processes the transactions of `block` in order.
    ///
    /// An error scoped to one transaction is logged and counted as failed, and
    /// processing continues with the next transaction. Store failures abort
    /// the block and are returned.
    #[instrument(
        skip_all,
        fields(height = block.header.height, chain_id = %block.header.chain_id)
    )]
    pub async fn process_block(&self, block: &DecodedBlock) -> Result<BlockSummary, IndexError> {
        let mut summary = BlockSummary::default();
        if block.header.height < self.settings.start_block {
            tracing::debug!(
                start_block = self.settings.start_block,
                "block is below start block, skipping"
            );
            summary.skipped = block.transactions.len();
            return Ok(summary);
        }

        for tx in &block.transactions {
            let status = match self.process_transaction(block, tx).await {
                Ok(TxStatus::Processed) => {
                    summary.processed += 1;
                    "processed"
                }
                Ok(TxStatus::Skipped) => {
                    summary.skipped += 1;
                    "skipped"
                }
                Err(err) if !err.is_fatal() => {
                    tracing::error!(tx_hash = %tx.hash, err = %err, "failed to process transaction");
                    summary.failed += 1;
                    "failed"
                }
                Err(err) => return Err(err),
            };
            metrics::PROCESSED_TRANSACTIONS_TOTAL
                .with_label_values(&[status])
                .inc();
        }

        tracing::info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            "block processed"
        );
        Ok(summary)
    }
}
