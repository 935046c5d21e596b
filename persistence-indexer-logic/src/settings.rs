use std::collections::HashSet;

use blockscout_service_launcher::{
    database::{DatabaseConnectSettings, DatabaseSettings},
    launcher::ConfigSettings,
    tracing::{JaegerSettings, TracingSettings},
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub indexer: IndexerSettings,
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,
    pub database: DatabaseSettings,
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "PERSISTENCE_INDEXER";

    fn validate(&self) -> anyhow::Result<()> {
        self.indexer.validate()
    }
}

impl Settings {
    pub fn default(database_url: String) -> Self {
        Self {
            indexer: Default::default(),
            tracing: Default::default(),
            jaeger: Default::default(),
            database: DatabaseSettings {
                connect: DatabaseConnectSettings::Url(database_url),
                create_database: Default::default(),
                run_migrations: Default::default(),
                connect_options: Default::default(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HandlerKind {
    DelegatorReward,
    IbcReceive,
    IbcSend,
    Transfer,
}

/// Routes events of `event_type` emitted by a `message_type` message to
/// `handler`. A filter without a message type matches any message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerFilter {
    pub event_type: String,
    #[serde(default)]
    pub message_type: Option<String>,
    pub handler: HandlerKind,
}

impl HandlerFilter {
    pub fn new(event_type: &str, message_type: Option<&str>, handler: HandlerKind) -> Self {
        Self {
            event_type: event_type.to_string(),
            message_type: message_type.map(str::to_string),
            handler,
        }
    }

    pub fn matches(&self, event_type: &str, message_type: Option<&str>) -> bool {
        self.event_type == event_type
            && match &self.message_type {
                Some(expected) => message_type == Some(expected.as_str()),
                None => true,
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerSettings {
    pub start_block: u64,
    pub include_failed_tx: bool,
    pub handlers: Vec<HandlerFilter>,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            start_block: 1,
            include_failed_tx: false,
            handlers: default_handlers(),
        }
    }
}

pub fn default_handlers() -> Vec<HandlerFilter> {
    vec![
        HandlerFilter::new(
            "coin_spent",
            Some("/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward"),
            HandlerKind::DelegatorReward,
        ),
        HandlerFilter::new(
            "recv_packet",
            Some("/ibc.core.channel.v1.MsgRecvPacket"),
            HandlerKind::IbcReceive,
        ),
        HandlerFilter::new(
            "send_packet",
            Some("/ibc.applications.transfer.v1.MsgTransfer"),
            HandlerKind::IbcSend,
        ),
        HandlerFilter::new(
            "transfer",
            Some("/cosmos.bank.v1beta1.MsgSend"),
            HandlerKind::Transfer,
        ),
        HandlerFilter::new(
            "transfer",
            Some("/cosmos.bank.v1beta1.MsgReceive"),
            HandlerKind::Transfer,
        ),
    ]
}

impl IndexerSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.handlers.is_empty() {
            anyhow::bail!("indexer.handlers must not be empty");
        }
        let mut seen = HashSet::new();
        for filter in &self.handlers {
            if !seen.insert((filter.event_type.as_str(), filter.message_type.as_deref())) {
                anyhow::bail!(
                    "duplicate handler filter for event `{}` and message {:?}",
                    filter.event_type,
                    filter.message_type
                );
            }
        }
        Ok(())
    }

    /// First filter matching the event, in table order.
    pub fn route(&self, event_type: &str, message_type: Option<&str>) -> Option<HandlerKind> {
        self.handlers
            .iter()
            .find(|filter| filter.matches(event_type, message_type))
            .map(|filter| filter.handler)
    }
}
