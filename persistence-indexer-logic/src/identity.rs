use chrono::{DateTime, SecondsFormat, Utc};

pub fn event_record_id(tx_hash: &str, msg_idx: u32, event_idx: usize) -> String {
    format!("{tx_hash}-{msg_idx}-{event_idx}")
}

pub fn transaction_record_id(height: u64, tx_hash: &str) -> String {
    format!("{height}-{tx_hash}")
}

pub fn normalize_address(address: &str) -> String {
    address.to_lowercase()
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-01T05:10:00.000Z`.
pub fn format_block_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Expects an already normalized address.
pub fn activity_record_id(address: &str, time: DateTime<Utc>) -> String {
    format!("{address}-{}", format_block_time(time))
}
