//! Typed extraction of event attributes.
//!
//! Every extractor does a single pass over the event's attributes. A key that
//! appears more than once keeps its last value. Fields that are not present
//! stay `None`; callers decide whether that is a skip or an error.

use std::str::FromStr;

use sea_orm::prelude::BigDecimal;
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::{
    error::IndexError,
    types::{Attribute, Event},
};

pub const AMOUNT_KEY: &str = "amount";
pub const SENDER_KEY: &str = "sender";
pub const RECIPIENT_KEY: &str = "recipient";
pub const PACKET_DATA_KEY: &str = "packet_data";
pub const PACKET_SEQUENCE_KEY: &str = "packet_sequence";

/// ICS-20 fungible token packet payload carried in `packet_data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PacketData {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    #[serde(default)]
    pub denom: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(value)) => Ok(Some(value)),
        Some(serde_json::Value::Number(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "amount must be a string or a number, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketAttributes {
    pub sequence: Option<String>,
    pub data: Option<PacketData>,
}

impl PacketAttributes {
    pub fn extract(event: &Event) -> Result<Self, IndexError> {
        event
            .attributes
            .iter()
            .try_fold(Self::default(), |mut extracted, attr| {
                match attr.key.as_str() {
                    PACKET_DATA_KEY => extracted.data = Some(parse_packet_data(event, attr)?),
                    PACKET_SEQUENCE_KEY => extracted.sequence = Some(attr.value.clone()),
                    _ => {}
                }
                Ok(extracted)
            })
    }
}

fn parse_packet_data(event: &Event, attr: &Attribute) -> Result<PacketData, IndexError> {
    serde_json::from_str(&attr.value).map_err(|err| malformed(event, attr.key.as_str(), err))
}

fn malformed(event: &Event, key: &str, reason: impl ToString) -> IndexError {
    IndexError::MalformedPayload {
        event: event.kind.clone(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// A packet that carries everything needed to correlate a fungible transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FungiblePacket {
    pub sequence: String,
    pub sender: String,
    pub receiver: String,
    pub amount: BigDecimal,
    pub denom: Option<String>,
}

impl FungiblePacket {
    /// `Ok(None)` when the packet does not carry a fungible transfer, i.e. any
    /// of sequence, sender, receiver or amount is absent or empty.
    pub fn extract(event: &Event) -> Result<Option<Self>, IndexError> {
        let PacketAttributes { sequence, data } = PacketAttributes::extract(event)?;
        let data = data.unwrap_or_default();
        let (Some(sequence), Some(sender), Some(receiver), Some(amount)) = (
            non_empty(sequence),
            non_empty(data.sender),
            non_empty(data.receiver),
            non_empty(data.amount),
        ) else {
            return Ok(None);
        };
        let amount = parse_token_amount(&amount)
            .map_err(|reason| malformed(event, PACKET_DATA_KEY, reason))?;

        Ok(Some(Self {
            sequence,
            sender,
            receiver,
            amount,
            denom: data.denom,
        }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Decimal digits of a uint256.
const MAX_AMOUNT_DIGITS: usize = 78;

/// ICS-20 amounts are unsigned integers in base 10.
fn parse_token_amount(amount: &str) -> Result<BigDecimal, String> {
    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("amount `{amount}` is not an unsigned integer"));
    }
    if amount.len() > MAX_AMOUNT_DIGITS {
        return Err(format!(
            "amount has {} digits, at most {MAX_AMOUNT_DIGITS} allowed",
            amount.len()
        ));
    }
    BigDecimal::from_str(amount).map_err(|err| err.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferAttributes {
    pub recipient: Option<String>,
    pub sender: Option<String>,
    pub amount: Option<String>,
}

impl TransferAttributes {
    pub fn extract(event: &Event) -> Self {
        event
            .attributes
            .iter()
            .fold(Self::default(), |mut extracted, attr| {
                match attr.key.as_str() {
                    RECIPIENT_KEY => extracted.recipient = Some(attr.value.clone()),
                    SENDER_KEY => extracted.sender = Some(attr.value.clone()),
                    AMOUNT_KEY => extracted.amount = Some(attr.value.clone()),
                    _ => {}
                }
                extracted
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardAttributes {
    pub amount: Option<String>,
}

impl RewardAttributes {
    pub fn extract(event: &Event) -> Self {
        Self {
            amount: event
                .attributes
                .iter()
                .rev()
                .find(|attr| attr.key == AMOUNT_KEY)
                .map(|attr| attr.value.clone()),
        }
    }
}

/// Every non-empty `sender` and `recipient` value across the events, in order.
pub fn participants(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .flat_map(|event| event.attributes.iter())
        .filter(|attr| matches!(attr.key.as_str(), SENDER_KEY | RECIPIENT_KEY))
        .map(|attr| attr.value.as_str())
        .filter(|value| !value.is_empty())
        .collect()
}
