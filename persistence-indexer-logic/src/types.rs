//! Decoded chain data as delivered by the block-fetching layer.
//!
//! The owned types ([`DecodedBlock`], [`DecodedTransaction`], ...) are what a
//! host runtime hands over; handlers only see the borrowed per-invocation
//! contexts ([`EventContext`], [`TransactionContext`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::IndexError, identity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub time: DateTime<Utc>,
    pub chain_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Index of the message that emitted the event. `None` for transaction
    /// level events (fees, signatures).
    #[serde(default)]
    pub msg_index: Option<u32>,
}

impl Event {
    pub fn new(kind: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
            msg_index: None,
        }
    }

    pub fn emitted_by(mut self, msg_index: u32) -> Self {
        self.msg_index = Some(msg_index);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(default)]
    pub amount: Vec<Coin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedMessage {
    pub type_url: String,
    #[serde(default)]
    pub delegator_address: Option<String>,
    #[serde(default)]
    pub validator_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedTransaction {
    pub hash: String,
    /// ABCI result code, zero on success.
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub messages: Vec<DecodedMessage>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl DecodedTransaction {
    pub fn is_successful(&self) -> bool {
        self.code == 0
    }

    /// Event contexts in emission order; the event index counts across the
    /// whole transaction.
    pub fn event_contexts<'a>(
        &'a self,
        block: &'a BlockHeader,
    ) -> impl Iterator<Item = EventContext<'a>> + 'a {
        self.events
            .iter()
            .enumerate()
            .map(move |(idx, event)| EventContext {
                block,
                tx_hash: &self.hash,
                idx,
                event,
                msg: event.msg_index.and_then(|msg_idx| {
                    self.messages
                        .get(msg_idx as usize)
                        .map(|message| MessageContext {
                            idx: msg_idx,
                            message,
                            fee: self.fee.as_ref(),
                        })
                }),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBlock {
    pub header: BlockHeader,
    #[serde(default)]
    pub transactions: Vec<DecodedTransaction>,
}

#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub idx: u32,
    pub message: &'a DecodedMessage,
    pub fee: Option<&'a Fee>,
}

#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    pub block: &'a BlockHeader,
    pub tx_hash: &'a str,
    pub idx: usize,
    pub event: &'a Event,
    pub msg: Option<MessageContext<'a>>,
}

impl<'a> EventContext<'a> {
    pub fn message(&self) -> Result<MessageContext<'a>, IndexError> {
        self.msg
            .ok_or_else(|| IndexError::missing("event context", "originating message"))
    }

    pub fn message_type(&self) -> Option<&'a str> {
        self.msg.map(|msg| msg.message.type_url.as_str())
    }

    /// `{txHash}-{msgIndex}-{eventIndex}` of the record derived from this event.
    pub fn record_id(&self) -> Result<String, IndexError> {
        let msg = self.message()?;
        Ok(identity::event_record_id(self.tx_hash, msg.idx, self.idx))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TransactionContext<'a> {
    pub block: &'a BlockHeader,
    pub tx: &'a DecodedTransaction,
}

impl<'a> TransactionContext<'a> {
    pub fn new(block: &'a BlockHeader, tx: &'a DecodedTransaction) -> Self {
        Self { block, tx }
    }

    pub fn events(&self) -> &'a [Event] {
        &self.tx.events
    }
}
