use lazy_static::lazy_static;
use prometheus::{IntCounterVec, register_int_counter_vec};

// Labels stay low-cardinality: handler names, skip reasons and statuses only.
lazy_static! {
    /// Events that reached a handler and were fully processed.
    pub static ref HANDLED_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "persistence_indexer_handled_events_total",
        "events processed by a handler",
        &["handler"],
    )
    .unwrap();

    /// Routed events that produced no record, by reason {malformed_payload, no_fungible_payload}.
    pub static ref SKIPPED_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "persistence_indexer_skipped_events_total",
        "events skipped by a handler",
        &["handler", "reason"],
    )
    .unwrap();

    /// Transactions by outcome {processed, skipped, failed}.
    pub static ref PROCESSED_TRANSACTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "persistence_indexer_processed_transactions_total",
        "transactions seen by the block loop",
        &["status"],
    )
    .unwrap();
}
