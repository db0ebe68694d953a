//! Position repository: per-(market, account) ledgers

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::{EventMeta, IndexerResult, StoragePort};
use crate::domain::identity;
use crate::domain::models::{Position, PositionDelta, PositionTransaction};

pub struct PositionRepository<S: StoragePort> {
    storage: Arc<S>,
}

impl<S: StoragePort> PositionRepository<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Load the position for (market, account), creating a zeroed one on first sight
    pub async fn get_or_create(&self, market_id: &str, account_id: &str) -> IndexerResult<Position> {
        let id = identity::position_id(market_id, account_id);
        if let Some(position) = self.storage.load::<Position>(&id).await? {
            return Ok(position);
        }

        let position = Position::new(id, market_id, account_id);
        self.storage.save(&position).await?;
        debug!("Created position {}", position.id);
        Ok(position)
    }

    /// Marker recorded for one log on one position, if it was already applied
    pub async fn find_transaction(
        &self,
        position_id: &str,
        meta: &EventMeta,
    ) -> IndexerResult<Option<PositionTransaction>> {
        let id = identity::position_transaction_id(position_id, &meta.tx_hash, meta.log_index);
        self.storage.load::<PositionTransaction>(&id).await
    }

    /// Fold one event's delta into the (market, account) ledger.
    ///
    /// The block number is always overwritten; the delta is applied only the
    /// first time this (position, tx hash, log index) is seen. The marker is
    /// written in the same atomic step as the updated position, so a failed
    /// write leaves neither behind and a retry applies the delta.
    pub async fn apply_update(
        &self,
        market_id: &str,
        account_id: &str,
        meta: &EventMeta,
        delta: PositionDelta,
    ) -> IndexerResult<Position> {
        let mut position = self.get_or_create(market_id, account_id).await?;
        position.accrual_block_number = meta.block.number;

        if self.find_transaction(&position.id, meta).await?.is_some() {
            warn!(
                "Skipping replayed log {}#{} for position {}",
                meta.tx_hash, meta.log_index, position.id
            );
            self.storage.save(&position).await?;
            return Ok(position);
        }

        position.accumulate(&delta);
        let marker = PositionTransaction::for_event(&position.id, meta);
        self.storage.save_pair(&position, &marker).await?;
        Ok(position)
    }
}
