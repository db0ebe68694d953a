//! LiquidationCall event processor

use std::sync::Arc;
use tracing::debug;

use super::ProcessorContext;
use crate::core::events::LiquidationCallParams;
use crate::core::{EventMeta, IndexerResult, StoragePort};
use crate::domain::finance::liquidation_proceeds;
use crate::domain::identity;
use crate::domain::models::LiquidationRecord;

pub struct LiquidationProcessor<S: StoragePort> {
    ctx: Arc<ProcessorContext<S>>,
}

impl<S: StoragePort> LiquidationProcessor<S> {
    pub fn new(ctx: Arc<ProcessorContext<S>>) -> Self {
        Self { ctx }
    }

    pub async fn process(
        &self,
        meta: &EventMeta,
        params: &LiquidationCallParams,
    ) -> IndexerResult<LiquidationRecord> {
        debug!(
            "Processing liquidation {}#{} of {} by {}",
            meta.tx_hash, meta.log_index, params.user, params.liquidator
        );
        let repos = &self.ctx.repos;

        let protocol = repos.protocols.resolve(&meta.address).await?;
        let market = repos
            .markets
            .get_or_create(&identity::entity_id(&meta.address), &protocol.id)
            .await?;

        let liquidator = repos.accounts.get_or_create(&identity::entity_id(&params.liquidator)).await?;
        let liquidatee = repos.accounts.get_or_create(&identity::entity_id(&params.user)).await?;

        let received = liquidation_proceeds(market.liquidity_rate.as_ref(), &params.debt_to_cover);

        let record = LiquidationRecord {
            id: identity::event_id(&meta.tx_hash, meta.log_index),
            protocol: market.protocol.clone(),
            market: market.id.clone(),
            asset: market.deposit_asset.clone(),
            collateral_asset: identity::entity_id(&params.collateral_asset),
            debt_asset: identity::entity_id(&params.debt_asset),
            amount: params.debt_to_cover.clone(),
            collateral_amount: params.liquidated_collateral_amount.clone(),
            liquidator: liquidator.id,
            from: liquidatee.id,
            to: market.id.clone(),
            received,
            receive_a_token: params.receive_a_token,
            block_number: meta.block.number_i32(),
            block_time: meta.block.timestamp_i32(),
        };
        self.ctx.recorder.record(&record).await?;

        Ok(record)
    }
}
