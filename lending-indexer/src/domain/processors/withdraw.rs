//! Withdraw event processor

use std::sync::Arc;
use tracing::debug;

use super::ProcessorContext;
use crate::core::events::WithdrawParams;
use crate::core::{EventMeta, IndexerResult, StoragePort};
use crate::domain::identity;
use crate::domain::models::{PositionDelta, WithdrawRecord};

pub struct WithdrawProcessor<S: StoragePort> {
    ctx: Arc<ProcessorContext<S>>,
}

impl<S: StoragePort> WithdrawProcessor<S> {
    pub fn new(ctx: Arc<ProcessorContext<S>>) -> Self {
        Self { ctx }
    }

    pub async fn process(&self, meta: &EventMeta, params: &WithdrawParams) -> IndexerResult<WithdrawRecord> {
        debug!("Processing withdraw {}#{} by {}", meta.tx_hash, meta.log_index, params.user);
        let repos = &self.ctx.repos;

        let protocol = repos.protocols.resolve(&meta.address).await?;
        let market = repos
            .markets
            .get_or_create(&identity::entity_id(&params.reserve), &protocol.id)
            .await?;

        let user = repos.accounts.get_or_create(&identity::entity_id(&params.user)).await?;
        let destination = repos.accounts.get_or_create(&identity::entity_id(&params.to)).await?;

        if self.ctx.settings.accumulate_supply_and_redeem {
            repos
                .positions
                .apply_update(&market.id, &user.id, meta, PositionDelta::Redeemed(params.amount.clone()))
                .await?;
        }

        let record = WithdrawRecord {
            id: identity::event_id(&meta.tx_hash, meta.log_index),
            protocol: market.protocol.clone(),
            market: market.id.clone(),
            asset: market.deposit_asset.clone(),
            account: user.id,
            from: market.id.clone(),
            to: destination.id,
            amount: params.amount.clone(),
            block_number: meta.block.number_i32(),
            block_time: meta.block.timestamp_i32(),
        };
        self.ctx.recorder.record(&record).await?;

        Ok(record)
    }
}
