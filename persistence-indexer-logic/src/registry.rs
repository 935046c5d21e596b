use chrono::{DateTime, Utc};

use crate::{
    error::StoreError,
    identity,
    records::{ActivityRecord, User},
    store::EntityStore,
};

/// Registers an observation of `address` at `observed_at`.
///
/// The user is created on first sight and never touched again; an activity
/// record is written for every call. Returns the canonical user id.
pub async fn ensure_user<S: EntityStore>(
    store: &S,
    address: &str,
    observed_at: DateTime<Utc>,
) -> Result<String, StoreError> {
    let id = identity::normalize_address(address);

    if store.get::<User>(&id).await?.is_none() {
        tracing::debug!(user = %id, "registering new user");
        store
            .save(User::builder().id(id.as_str()).first_seen(observed_at).build())
            .await?;
    }

    let activity = ActivityRecord::builder()
        .id(identity::activity_record_id(&id, observed_at))
        .address(id.as_str())
        .block_time(observed_at)
        .build();
    store.save(activity).await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_seen_is_kept_and_activity_appended() {
        let store = MemoryStore::new();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 5, 10, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 1, 5, 50, 0).unwrap();

        let id = ensure_user(&store, "Persistence1ABC", first).await.unwrap();
        assert_eq!(id, "persistence1abc");
        let id = ensure_user(&store, "persistence1abc", second).await.unwrap();
        assert_eq!(id, "persistence1abc");

        assert_eq!(
            store.all::<User>().unwrap(),
            vec![User::builder().id("persistence1abc").first_seen(first).build()]
        );
        let activity = store.all::<ActivityRecord>().unwrap();
        assert_eq!(
            activity.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            vec![
                "persistence1abc-2024-01-01T05:10:00.000Z",
                "persistence1abc-2024-01-01T05:50:00.000Z",
            ]
        );
    }

    #[tokio::test]
    async fn n_observations_yield_n_activity_records() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        for minute in 0..5 {
            let observed_at = start + chrono::Duration::minutes(minute);
            ensure_user(&store, "addr", observed_at).await.unwrap();
        }

        assert_eq!(store.len::<User>(), 1);
        assert_eq!(store.len::<ActivityRecord>(), 5);
    }

    #[tokio::test]
    async fn same_timestamp_is_one_activity_record() {
        let store = MemoryStore::new();
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        ensure_user(&store, "ADDR", time).await.unwrap();
        ensure_user(&store, "addr", time).await.unwrap();

        assert_eq!(store.len::<ActivityRecord>(), 1);
    }
}
