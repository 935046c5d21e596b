//! Derived entities produced by the handlers.
//!
//! Each record is built once from fully extracted fields and mapped onto its
//! table row through [`Record`].

use bon::Builder;
use chrono::{DateTime, Utc};
use persistence_indexer_entity::{
    activity_records, reward_events, sea_orm_active_enums::TransferDirection, transactions,
    transfer_correlations, transfers, users,
};
use sea_orm::prelude::BigDecimal;
use strum::{AsRefStr, Display, EnumString};

use crate::{
    error::StoreError,
    store::{
        Record,
        convert::{from_db_i64, from_db_time, to_db_time, to_db_u64},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct RewardEvent {
    #[builder(into)]
    pub id: String,
    pub block_height: u64,
    pub block_time: DateTime<Utc>,
    #[builder(into)]
    pub tx_hash: String,
    #[builder(into)]
    pub delegator_address: String,
    #[builder(into)]
    pub validator_address: String,
    #[builder(into)]
    pub fee_amount: String,
    #[builder(into)]
    pub fee_denom: String,
    #[builder(into)]
    pub reward_amount: Option<String>,
}

impl Record for RewardEvent {
    type Entity = reward_events::Entity;
    type Model = reward_events::Model;
    type ActiveModel = reward_events::ActiveModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn id_column() -> reward_events::Column {
        reward_events::Column::Id
    }

    fn from_model(model: Self::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: model.id,
            block_height: from_db_i64(model.block_height, "block_height")?,
            block_time: from_db_time(model.block_time),
            tx_hash: model.tx_hash,
            delegator_address: model.delegator_address,
            validator_address: model.validator_address,
            fee_amount: model.fee_amount,
            fee_denom: model.fee_denom,
            reward_amount: model.reward_amount,
        })
    }

    fn into_model(self) -> Result<Self::Model, StoreError> {
        Ok(reward_events::Model {
            id: self.id,
            block_height: to_db_u64(self.block_height, "block_height")?,
            block_time: to_db_time(self.block_time),
            tx_hash: self.tx_hash,
            delegator_address: self.delegator_address,
            validator_address: self.validator_address,
            fee_amount: self.fee_amount,
            fee_denom: self.fee_denom,
            reward_amount: self.reward_amount,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct User {
    /// Canonical (lower-cased) address.
    #[builder(into)]
    pub id: String,
    pub first_seen: DateTime<Utc>,
}

impl Record for User {
    type Entity = users::Entity;
    type Model = users::Model;
    type ActiveModel = users::ActiveModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn id_column() -> users::Column {
        users::Column::Id
    }

    fn from_model(model: Self::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: model.id,
            first_seen: from_db_time(model.first_seen),
        })
    }

    fn into_model(self) -> Result<Self::Model, StoreError> {
        Ok(users::Model {
            id: self.id,
            first_seen: to_db_time(self.first_seen),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ActivityRecord {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub address: String,
    pub block_time: DateTime<Utc>,
}

impl Record for ActivityRecord {
    type Entity = activity_records::Entity;
    type Model = activity_records::Model;
    type ActiveModel = activity_records::ActiveModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn id_column() -> activity_records::Column {
        activity_records::Column::Id
    }

    fn from_model(model: Self::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: model.id,
            address: model.address,
            block_time: from_db_time(model.block_time),
        })
    }

    fn into_model(self) -> Result<Self::Model, StoreError> {
        Ok(activity_records::Model {
            id: self.id,
            address: self.address,
            block_time: to_db_time(self.block_time),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Transfer {
    #[builder(into)]
    pub id: String,
    pub block_height: u64,
    pub block_time: DateTime<Utc>,
    #[builder(into)]
    pub tx_hash: String,
    #[builder(into)]
    pub recipient: Option<String>,
    #[builder(into)]
    pub sender: Option<String>,
    #[builder(into)]
    pub amount: Option<String>,
}

impl Record for Transfer {
    type Entity = transfers::Entity;
    type Model = transfers::Model;
    type ActiveModel = transfers::ActiveModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn id_column() -> transfers::Column {
        transfers::Column::Id
    }

    fn from_model(model: Self::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: model.id,
            block_height: from_db_i64(model.block_height, "block_height")?,
            block_time: from_db_time(model.block_time),
            tx_hash: model.tx_hash,
            recipient: model.recipient,
            sender: model.sender,
            amount: model.amount,
        })
    }

    fn into_model(self) -> Result<Self::Model, StoreError> {
        Ok(transfers::Model {
            id: self.id,
            block_height: to_db_u64(self.block_height, "block_height")?,
            block_time: to_db_time(self.block_time),
            tx_hash: self.tx_hash,
            recipient: self.recipient,
            sender: self.sender,
            amount: self.amount,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Transaction {
    #[builder(into)]
    pub id: String,
    pub block_height: u64,
    pub block_time: DateTime<Utc>,
    #[builder(into)]
    pub tx_hash: String,
}

impl Record for Transaction {
    type Entity = transactions::Entity;
    type Model = transactions::Model;
    type ActiveModel = transactions::ActiveModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn id_column() -> transactions::Column {
        transactions::Column::Id
    }

    fn from_model(model: Self::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: model.id,
            block_height: from_db_i64(model.block_height, "block_height")?,
            block_time: from_db_time(model.block_time),
            tx_hash: model.tx_hash,
        })
    }

    fn into_model(self) -> Result<Self::Model, StoreError> {
        Ok(transactions::Model {
            id: self.id,
            block_height: to_db_u64(self.block_height, "block_height")?,
            block_time: to_db_time(self.block_time),
            tx_hash: self.tx_hash,
        })
    }
}

/// Side of an IBC transfer as seen from the indexed chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl From<Direction> for TransferDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::In => TransferDirection::In,
            Direction::Out => TransferDirection::Out,
        }
    }
}

impl From<TransferDirection> for Direction {
    fn from(direction: TransferDirection) -> Self {
        match direction {
            TransferDirection::In => Direction::In,
            TransferDirection::Out => Direction::Out,
        }
    }
}

/// Chain and transaction in which one leg of a transfer was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub chain_id: String,
    pub tx_hash: String,
}

impl Provenance {
    pub fn new(chain_id: impl Into<String>, tx_hash: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            tx_hash: tx_hash.into(),
        }
    }

    fn from_columns(
        chain_id: Option<String>,
        tx_hash: Option<String>,
        side: &str,
    ) -> Result<Option<Self>, StoreError> {
        match (chain_id, tx_hash) {
            (Some(chain_id), Some(tx_hash)) => Ok(Some(Self { chain_id, tx_hash })),
            (None, None) => Ok(None),
            _ => Err(StoreError::Conversion(format!(
                "{side} provenance must have both chain id and tx hash"
            ))),
        }
    }

    fn into_columns(provenance: Option<Self>) -> (Option<String>, Option<String>) {
        provenance
            .map(|p| (Some(p.chain_id), Some(p.tx_hash)))
            .unwrap_or_default()
    }
}

/// One cross-chain transfer keyed by its packet sequence.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct TransferCorrelation {
    #[builder(into)]
    pub id: String,
    pub block_height: u64,
    pub block_time: DateTime<Utc>,
    #[builder(into)]
    pub tx_hash: String,
    #[builder(into)]
    pub sender_id: String,
    #[builder(into)]
    pub receiver_id: String,
    pub amount: BigDecimal,
    #[builder(into)]
    pub denom: Option<String>,
    pub direction: Direction,
    pub source: Option<Provenance>,
    pub destination: Option<Provenance>,
}

impl Record for TransferCorrelation {
    type Entity = transfer_correlations::Entity;
    type Model = transfer_correlations::Model;
    type ActiveModel = transfer_correlations::ActiveModel;

    fn id(&self) -> &str {
        &self.id
    }

    fn id_column() -> transfer_correlations::Column {
        transfer_correlations::Column::Id
    }

    fn from_model(model: Self::Model) -> Result<Self, StoreError> {
        Ok(Self {
            source: Provenance::from_columns(model.source_chain, model.source_chain_tx, "source")?,
            destination: Provenance::from_columns(
                model.destination_chain,
                model.destination_chain_tx,
                "destination",
            )?,
            id: model.id,
            block_height: from_db_i64(model.block_height, "block_height")?,
            block_time: from_db_time(model.block_time),
            tx_hash: model.tx_hash,
            sender_id: model.sender_id,
            receiver_id: model.receiver_id,
            amount: model.amount,
            denom: model.denom,
            direction: model.direction.into(),
        })
    }

    fn into_model(self) -> Result<Self::Model, StoreError> {
        let (source_chain, source_chain_tx) = Provenance::into_columns(self.source);
        let (destination_chain, destination_chain_tx) =
            Provenance::into_columns(self.destination);
        Ok(transfer_correlations::Model {
            id: self.id,
            block_height: to_db_u64(self.block_height, "block_height")?,
            block_time: to_db_time(self.block_time),
            tx_hash: self.tx_hash,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            amount: self.amount,
            denom: self.denom,
            direction: self.direction.into(),
            source_chain,
            source_chain_tx,
            destination_chain,
            destination_chain_tx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn direction_renders_as_tag() {
        assert_eq!(Direction::In.to_string(), "in");
        assert_eq!(Direction::Out.as_ref(), "out");
        assert_eq!("out".parse::<Direction>().unwrap(), Direction::Out);
    }

    #[test]
    fn correlation_without_destination_keeps_columns_empty() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let correlation = TransferCorrelation::builder()
            .id("42")
            .block_height(10)
            .block_time(time)
            .tx_hash("HASH")
            .sender_id("addra")
            .receiver_id("addrb")
            .amount(BigDecimal::from(100))
            .direction(Direction::Out)
            .source(Provenance::new("core-1", "HASH"))
            .build();

        let model = correlation.clone().into_model().unwrap();
        assert_eq!(model.source_chain.as_deref(), Some("core-1"));
        assert_eq!(model.destination_chain, None);
        assert_eq!(model.destination_chain_tx, None);
        assert_eq!(model.direction, TransferDirection::Out);
        assert_eq!(TransferCorrelation::from_model(model).unwrap(), correlation);
    }

    #[test]
    fn half_set_provenance_is_rejected() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let model = transfer_correlations::Model {
            id: "1".to_string(),
            block_height: 1,
            block_time: time.naive_utc(),
            tx_hash: "HASH".to_string(),
            sender_id: "a".to_string(),
            receiver_id: "b".to_string(),
            amount: BigDecimal::from(1),
            denom: None,
            direction: TransferDirection::In,
            source_chain: Some("core-1".to_string()),
            source_chain_tx: None,
            destination_chain: None,
            destination_chain_tx: None,
        };
        assert!(matches!(
            TransferCorrelation::from_model(model),
            Err(StoreError::Conversion(_))
        ));
    }

    #[test]
    fn negative_height_is_rejected() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let model = transactions::Model {
            id: "1-HASH".to_string(),
            block_height: -1,
            block_time: time.naive_utc(),
            tx_hash: "HASH".to_string(),
        };
        assert!(matches!(
            Transaction::from_model(model),
            Err(StoreError::Conversion(_))
        ));
    }
}
