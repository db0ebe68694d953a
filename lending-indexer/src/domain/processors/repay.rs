//! Repay event processor

use std::sync::Arc;
use tracing::debug;

use super::ProcessorContext;
use crate::core::events::RepayParams;
use crate::core::{EventMeta, IndexerResult, StoragePort};
use crate::domain::identity;
use crate::domain::models::{PositionDelta, RepayRecord};

pub struct RepayProcessor<S: StoragePort> {
    ctx: Arc<ProcessorContext<S>>,
}

impl<S: StoragePort> RepayProcessor<S> {
    pub fn new(ctx: Arc<ProcessorContext<S>>) -> Self {
        Self { ctx }
    }

    pub async fn process(&self, meta: &EventMeta, params: &RepayParams) -> IndexerResult<RepayRecord> {
        debug!("Processing repay {}#{} for {}", meta.tx_hash, meta.log_index, params.user);
        let repos = &self.ctx.repos;

        let protocol = repos.protocols.resolve(&meta.address).await?;
        let market = repos
            .markets
            .get_or_create(&identity::entity_id(&meta.address), &protocol.id)
            .await?;

        // The repayer may settle someone else's debt
        let borrower = repos.accounts.get_or_create(&identity::entity_id(&params.user)).await?;
        let repayer = repos.accounts.get_or_create(&identity::entity_id(&params.repayer)).await?;

        repos
            .positions
            .apply_update(&market.id, &borrower.id, meta, PositionDelta::Repaid(params.amount.clone()))
            .await?;

        let record = RepayRecord {
            id: identity::event_id(&meta.tx_hash, meta.log_index),
            protocol: market.protocol.clone(),
            market: market.id.clone(),
            borrower: borrower.id,
            repayer: repayer.id,
            amount: params.amount.clone(),
            use_a_tokens: params.use_a_tokens,
            block_number: meta.block.number_i32(),
            block_time: meta.block.timestamp_i32(),
        };
        self.ctx.recorder.record(&record).await?;

        Ok(record)
    }
}
