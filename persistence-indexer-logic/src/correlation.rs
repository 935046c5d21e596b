//! Merges the send and receive legs of an IBC transfer into one record per
//! packet sequence.

use crate::{
    attributes::FungiblePacket,
    error::StoreError,
    records::{Direction, Provenance, TransferCorrelation},
    registry,
    store::EntityStore,
    types::BlockHeader,
};

/// Records one leg of a transfer observed in `tx_hash` of `block`.
///
/// The first leg creates the correlation and fixes its amount, denom,
/// participants and direction. A later leg only fills in its own provenance.
pub async fn observe<S: EntityStore>(
    store: &S,
    block: &BlockHeader,
    tx_hash: &str,
    packet: FungiblePacket,
    direction: Direction,
) -> Result<(), StoreError> {
    let provenance = Provenance::new(block.chain_id.as_str(), tx_hash);

    let correlation = match store.get::<TransferCorrelation>(&packet.sequence).await? {
        Some(mut existing) => {
            tracing::debug!(
                sequence = %packet.sequence,
                direction = %direction,
                first_direction = %existing.direction,
                "merging second leg into transfer correlation"
            );
            match direction {
                Direction::In => existing.destination = Some(provenance),
                Direction::Out => existing.source = Some(provenance),
            }
            existing
        }
        None => {
            let sender_id = registry::ensure_user(store, &packet.sender, block.time).await?;
            let receiver_id = registry::ensure_user(store, &packet.receiver, block.time).await?;
            let (source, destination) = match direction {
                Direction::In => (None, Some(provenance)),
                Direction::Out => (Some(provenance), None),
            };
            TransferCorrelation::builder()
                .id(packet.sequence)
                .block_height(block.height)
                .block_time(block.time)
                .tx_hash(tx_hash)
                .sender_id(sender_id)
                .receiver_id(receiver_id)
                .amount(packet.amount)
                .maybe_denom(packet.denom)
                .direction(direction)
                .maybe_source(source)
                .maybe_destination(destination)
                .build()
        }
    };

    store.save(correlation).await
}
