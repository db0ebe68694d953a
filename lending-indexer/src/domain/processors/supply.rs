//! Supply (deposit) event processor

use std::sync::Arc;
use tracing::debug;

use super::ProcessorContext;
use crate::core::events::SupplyParams;
use crate::core::{EventMeta, IndexerResult, StoragePort};
use crate::domain::identity;
use crate::domain::models::{DepositRecord, PositionDelta};

pub struct SupplyProcessor<S: StoragePort> {
    ctx: Arc<ProcessorContext<S>>,
}

impl<S: StoragePort> SupplyProcessor<S> {
    pub fn new(ctx: Arc<ProcessorContext<S>>) -> Self {
        Self { ctx }
    }

    pub async fn process(&self, meta: &EventMeta, params: &SupplyParams) -> IndexerResult<DepositRecord> {
        debug!("Processing supply {}#{} by {}", meta.tx_hash, meta.log_index, params.user);
        let repos = &self.ctx.repos;

        // Supply logs name the reserve; the market is keyed by it
        let protocol = repos.protocols.resolve(&meta.address).await?;
        let market = repos
            .markets
            .get_or_create(&identity::entity_id(&params.reserve), &protocol.id)
            .await?;

        let user = repos.accounts.get_or_create(&identity::entity_id(&params.user)).await?;
        let on_behalf_of = repos
            .accounts
            .get_or_create(&identity::entity_id(&params.on_behalf_of))
            .await?;

        if self.ctx.settings.accumulate_supply_and_redeem {
            repos
                .positions
                .apply_update(&market.id, &on_behalf_of.id, meta, PositionDelta::Supplied(params.amount.clone()))
                .await?;
        }

        let record = DepositRecord {
            id: identity::event_id(&meta.tx_hash, meta.log_index),
            protocol: market.protocol.clone(),
            market: market.id.clone(),
            asset: market.deposit_asset.clone(),
            from: user.id,
            to: market.id.clone(),
            on_behalf_of: on_behalf_of.id,
            amount: params.amount.clone(),
            referral_code: i32::from(params.referral_code),
            block_number: meta.block.number_i32(),
            block_time: meta.block.timestamp_i32(),
        };
        self.ctx.recorder.record(&record).await?;

        Ok(record)
    }
}
