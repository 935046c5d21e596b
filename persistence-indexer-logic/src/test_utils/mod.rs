use async_trait::async_trait;
use blockscout_service_launcher::test_database::TestDbGuard;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    error::StoreError,
    store::{EntityStore, Record},
    types::{Attribute, BlockHeader, Coin, DecodedMessage, DecodedTransaction, Event, Fee},
};

pub async fn init_db(name: &str) -> TestDbGuard {
    TestDbGuard::new::<migration::Migrator>(name).await
}

pub fn block_header(height: u64, time: &str, chain_id: &str) -> BlockHeader {
    BlockHeader {
        height,
        time: DateTime::parse_from_rfc3339(time)
            .unwrap()
            .with_timezone(&Utc),
        chain_id: chain_id.to_string(),
    }
}

pub fn event(kind: &str, attributes: &[(&str, &str)]) -> Event {
    Event::new(
        kind,
        attributes
            .iter()
            .map(|(key, value)| Attribute::new(*key, *value))
            .collect(),
    )
}

pub fn packet_event(kind: &str, sequence: &str, data: &str) -> Event {
    event(
        kind,
        &[
            ("packet_sequence", sequence),
            ("packet_data", data),
            ("packet_src_channel", "channel-0"),
        ],
    )
}

pub fn reward_message(delegator: &str, validator: &str) -> DecodedMessage {
    DecodedMessage {
        type_url: "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward".to_string(),
        delegator_address: Some(delegator.to_string()),
        validator_address: Some(validator.to_string()),
    }
}

pub fn transfer_message(type_url: &str) -> DecodedMessage {
    DecodedMessage {
        type_url: type_url.to_string(),
        delegator_address: None,
        validator_address: None,
    }
}

/// Successful transaction paying a 5000uxprt fee.
pub fn transaction_with(
    hash: &str,
    messages: Vec<DecodedMessage>,
    events: Vec<Event>,
) -> DecodedTransaction {
    DecodedTransaction {
        hash: hash.to_string(),
        code: 0,
        fee: Some(Fee {
            amount: vec![Coin {
                denom: "uxprt".to_string(),
                amount: "5000".to_string(),
            }],
        }),
        messages,
        events,
    }
}

/// Store whose every operation fails, for exercising the fatal error path.
pub struct FailingStore;

#[async_trait]
impl EntityStore for FailingStore {
    async fn get<R: Record>(&self, _id: &str) -> Result<Option<R>, StoreError> {
        Err(DbErr::Custom("store is unavailable".to_string()).into())
    }

    async fn save<R: Record>(&self, _record: R) -> Result<(), StoreError> {
        Err(DbErr::Custom("store is unavailable".to_string()).into())
    }
}
