//! Borrow event processor

use std::sync::Arc;
use tracing::debug;

use super::ProcessorContext;
use crate::core::events::BorrowParams;
use crate::core::{EventMeta, IndexerResult, StoragePort};
use crate::domain::identity;
use crate::domain::models::{BorrowRecord, PositionDelta};

pub struct BorrowProcessor<S: StoragePort> {
    ctx: Arc<ProcessorContext<S>>,
}

impl<S: StoragePort> BorrowProcessor<S> {
    pub fn new(ctx: Arc<ProcessorContext<S>>) -> Self {
        Self { ctx }
    }

    pub async fn process(&self, meta: &EventMeta, params: &BorrowParams) -> IndexerResult<BorrowRecord> {
        debug!("Processing borrow {}#{} by {}", meta.tx_hash, meta.log_index, params.user);
        let repos = &self.ctx.repos;

        let protocol = repos.protocols.resolve(&meta.address).await?;
        let market = repos
            .markets
            .get_or_create(&identity::entity_id(&meta.address), &protocol.id)
            .await?;

        let mut borrower = repos.accounts.get_or_create(&identity::entity_id(&params.user)).await?;
        if borrower.mark_borrowed() {
            repos.accounts.save(&borrower).await?;
        }

        repos
            .positions
            .apply_update(&market.id, &borrower.id, meta, PositionDelta::Borrowed(params.amount.clone()))
            .await?;

        let record = BorrowRecord {
            id: identity::borrow_event_id(&meta.tx_hash, meta.log_index, self.ctx.settings.borrow_id_policy()),
            protocol: market.protocol.clone(),
            market: market.id.clone(),
            borrower: borrower.id.clone(),
            on_behalf_of: identity::entity_id(&params.on_behalf_of),
            amount: params.amount.clone(),
            borrow_rate: params.borrow_rate.clone(),
            interest_rate_mode: params.interest_rate_mode.into(),
            block_number: meta.block.number_i32(),
            block_time: meta.block.timestamp_i32(),
        };
        self.ctx.recorder.record(&record).await?;

        Ok(record)
    }
}
