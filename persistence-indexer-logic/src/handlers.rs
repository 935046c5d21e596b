//! One function per handler kind. Each reads what it needs from the store,
//! builds its records and saves them before returning.

use strum::{AsRefStr, Display};

use crate::{
    attributes::{self, FungiblePacket, RewardAttributes, TransferAttributes},
    correlation,
    error::IndexError,
    identity,
    records::{Direction, RewardEvent, Transaction, Transfer},
    registry,
    store::EntityStore,
    timespan,
    types::{EventContext, TransactionContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    NoFungiblePayload,
    MalformedPayload,
}

pub async fn handle_delegator_reward<S: EntityStore>(
    store: &S,
    ctx: &EventContext<'_>,
) -> Result<Outcome, IndexError> {
    let msg = ctx.message()?;
    let delegator_address = msg
        .message
        .delegator_address
        .as_deref()
        .ok_or_else(|| IndexError::missing("withdraw reward message", "delegator_address"))?;
    let validator_address = msg
        .message
        .validator_address
        .as_deref()
        .ok_or_else(|| IndexError::missing("withdraw reward message", "validator_address"))?;
    let fee = msg
        .fee
        .and_then(|fee| fee.amount.first())
        .ok_or_else(|| IndexError::missing("transaction", "fee"))?;
    let RewardAttributes { amount } = RewardAttributes::extract(ctx.event);

    let reward = RewardEvent::builder()
        .id(ctx.record_id()?)
        .block_height(ctx.block.height)
        .block_time(ctx.block.time)
        .tx_hash(ctx.tx_hash)
        .delegator_address(delegator_address)
        .validator_address(validator_address)
        .fee_amount(fee.amount.as_str())
        .fee_denom(fee.denom.as_str())
        .maybe_reward_amount(amount)
        .build();
    store.save(reward).await?;
    Ok(Outcome::Handled)
}

pub async fn handle_ibc<S: EntityStore>(
    store: &S,
    ctx: &EventContext<'_>,
    direction: Direction,
) -> Result<Outcome, IndexError> {
    let Some(packet) = FungiblePacket::extract(ctx.event)? else {
        tracing::debug!("packet does not carry a fungible transfer");
        return Ok(Outcome::Skipped(SkipReason::NoFungiblePayload));
    };
    correlation::observe(store, ctx.block, ctx.tx_hash, packet, direction).await?;
    Ok(Outcome::Handled)
}

pub async fn handle_transfer<S: EntityStore>(
    store: &S,
    ctx: &EventContext<'_>,
) -> Result<Outcome, IndexError> {
    let TransferAttributes {
        recipient,
        sender,
        amount,
    } = TransferAttributes::extract(ctx.event);

    let transfer = Transfer::builder()
        .id(ctx.record_id()?)
        .block_height(ctx.block.height)
        .block_time(ctx.block.time)
        .tx_hash(ctx.tx_hash)
        .maybe_recipient(recipient)
        .maybe_sender(sender)
        .maybe_amount(amount)
        .build();
    store.save(transfer).await?;
    Ok(Outcome::Handled)
}

/// Transaction record, a user registration for every participant, and the
/// time bucket counters.
pub async fn handle_transaction<S: EntityStore>(
    store: &S,
    ctx: &TransactionContext<'_>,
) -> Result<(), IndexError> {
    let transaction = Transaction::builder()
        .id(identity::transaction_record_id(ctx.block.height, &ctx.tx.hash))
        .block_height(ctx.block.height)
        .block_time(ctx.block.time)
        .tx_hash(ctx.tx.hash.as_str())
        .build();
    store.save(transaction).await?;

    for address in attributes::participants(ctx.events()) {
        registry::ensure_user(store, address, ctx.block.time).await?;
    }

    timespan::record_transaction(store, ctx.block).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        records::{ActivityRecord, TransferCorrelation, User},
        store::MemoryStore,
        test_utils::{
            block_header, event, packet_event, reward_message, transaction_with, transfer_message,
        },
        timespan::HourlySnapshot,
        types::{Coin, DecodedMessage, Fee},
    };
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn reward_event_is_built_from_message_fee_and_attributes() {
        let store = MemoryStore::new();
        let block = block_header(7, "2024-01-01T05:10:00Z", "core-1");
        let tx = transaction_with(
            "HASH",
            vec![reward_message("persistence1del", "persistencevaloper1val")],
            vec![event(
                "coin_spent",
                &[("spender", "distr"), ("amount", "15uxprt")],
            )
            .emitted_by(0)],
        );
        let ctx = tx.event_contexts(&block).next().unwrap();

        let outcome = handle_delegator_reward(&store, &ctx).await.unwrap();
        assert_eq!(outcome, Outcome::Handled);

        let reward = store.get::<RewardEvent>("HASH-0-0").await.unwrap().unwrap();
        assert_eq!(
            reward,
            RewardEvent::builder()
                .id("HASH-0-0")
                .block_height(7)
                .block_time(block.time)
                .tx_hash("HASH")
                .delegator_address("persistence1del")
                .validator_address("persistencevaloper1val")
                .fee_amount("5000")
                .fee_denom("uxprt")
                .reward_amount("15uxprt")
                .build()
        );
    }

    #[tokio::test]
    async fn reward_without_amount_leaves_it_empty() {
        let store = MemoryStore::new();
        let block = block_header(7, "2024-01-01T05:10:00Z", "core-1");
        let tx = transaction_with(
            "HASH",
            vec![reward_message("del", "val")],
            vec![event("coin_spent", &[("spender", "distr")]).emitted_by(0)],
        );
        let ctx = tx.event_contexts(&block).next().unwrap();

        handle_delegator_reward(&store, &ctx).await.unwrap();
        let reward = store.get::<RewardEvent>("HASH-0-0").await.unwrap().unwrap();
        assert_eq!(reward.reward_amount, None);
    }

    #[tokio::test]
    async fn reward_requires_fee_and_addresses() {
        let store = MemoryStore::new();
        let block = block_header(7, "2024-01-01T05:10:00Z", "core-1");

        let mut without_fee = transaction_with(
            "HASH",
            vec![reward_message("del", "val")],
            vec![event("coin_spent", &[("amount", "1uxprt")]).emitted_by(0)],
        );
        without_fee.fee = Some(Fee { amount: vec![] });
        let ctx = without_fee.event_contexts(&block).next().unwrap();
        assert!(matches!(
            handle_delegator_reward(&store, &ctx).await,
            Err(IndexError::MissingField { field: "fee", .. })
        ));

        let without_validator = transaction_with(
            "HASH",
            vec![DecodedMessage {
                type_url: "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward".to_string(),
                delegator_address: Some("del".to_string()),
                validator_address: None,
            }],
            vec![event("coin_spent", &[("amount", "1uxprt")]).emitted_by(0)],
        );
        let ctx = without_validator.event_contexts(&block).next().unwrap();
        assert!(matches!(
            handle_delegator_reward(&store, &ctx).await,
            Err(IndexError::MissingField {
                field: "validator_address",
                ..
            })
        ));

        assert_eq!(store.len::<RewardEvent>(), 0);
    }

    #[tokio::test]
    async fn ibc_without_fungible_payload_is_skipped() {
        let store = MemoryStore::new();
        let block = block_header(7, "2024-01-01T05:10:00Z", "core-1");
        let tx = transaction_with(
            "HASH",
            vec![transfer_message("/ibc.core.channel.v1.MsgRecvPacket")],
            vec![packet_event("recv_packet", "3", r#"{"data":"opaque"}"#).emitted_by(0)],
        );
        let ctx = tx.event_contexts(&block).next().unwrap();

        let outcome = handle_ibc(&store, &ctx, Direction::In).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::NoFungiblePayload));
        assert_eq!(store.len::<TransferCorrelation>(), 0);
        assert_eq!(store.len::<User>(), 0);
    }

    #[tokio::test]
    async fn transfer_keeps_absent_attributes_empty() {
        let store = MemoryStore::new();
        let block = block_header(7, "2024-01-01T05:10:00Z", "core-1");
        let tx = transaction_with(
            "HASH",
            vec![
                transfer_message("/cosmos.bank.v1beta1.MsgSend"),
                transfer_message("/cosmos.bank.v1beta1.MsgSend"),
            ],
            vec![
                event("message", &[("action", "send")]).emitted_by(0),
                event("transfer", &[("recipient", "addrB"), ("amount", "1uxprt")]).emitted_by(1),
            ],
        );
        let ctx = tx.event_contexts(&block).nth(1).unwrap();

        handle_transfer(&store, &ctx).await.unwrap();
        let transfer = store.get::<Transfer>("HASH-1-1").await.unwrap().unwrap();
        assert_eq!(transfer.recipient.as_deref(), Some("addrB"));
        assert_eq!(transfer.sender, None);
        assert_eq!(transfer.amount.as_deref(), Some("1uxprt"));
    }

    #[tokio::test]
    async fn transaction_registers_participants_and_buckets() {
        let store = MemoryStore::new();
        let block = block_header(12, "2024-01-01T05:10:00Z", "core-1");
        let mut tx = transaction_with(
            "HASH",
            vec![transfer_message("/cosmos.bank.v1beta1.MsgSend")],
            vec![
                event("transfer", &[("recipient", "AddrB"), ("sender", "addrA")]).emitted_by(0),
                event("message", &[("sender", "addrA")]).emitted_by(0),
            ],
        );
        tx.fee = Some(Fee {
            amount: vec![Coin {
                denom: "uxprt".to_string(),
                amount: "1".to_string(),
            }],
        });

        handle_transaction(&store, &TransactionContext::new(&block, &tx))
            .await
            .unwrap();

        let transaction = store.get::<Transaction>("12-HASH").await.unwrap().unwrap();
        assert_eq!(transaction.tx_hash, "HASH");
        assert_eq!(
            store
                .all::<User>()
                .unwrap()
                .into_iter()
                .map(|user| user.id)
                .collect::<Vec<_>>(),
            vec!["addra", "addrb"]
        );
        // the same address and timestamp map onto one activity record
        assert_eq!(store.len::<ActivityRecord>(), 2);
        let hourly = store.get::<HourlySnapshot>("2024-01-01-05").await.unwrap();
        assert_eq!(hourly.map(|s| s.tx_count), Some(1));
    }
}
