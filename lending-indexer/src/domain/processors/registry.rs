//! Processor registry for routing decoded events

use std::sync::Arc;
use tracing::debug;

use super::{
    BorrowProcessor, LiquidationProcessor, ProcessorContext, RepayProcessor, SupplyProcessor,
    WithdrawProcessor,
};
use crate::config::{IndexerSettings, ProtocolSettings};
use crate::core::{Address, EventKind, EventPayload, IndexerResult, LendingEvent, StoragePort};
use crate::domain::watchlist::WatchList;

/// What processing one event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// State was reconciled and a record written
    Applied(EventKind),
    /// Acknowledged signal with no state effect
    Ignored(EventKind),
    /// A new event source was registered (false if already watched)
    Registered { address: Address, newly_watched: bool },
}

/// Registry for all event processors
pub struct ProcessorRegistry<S: StoragePort> {
    borrow: BorrowProcessor<S>,
    repay: RepayProcessor<S>,
    supply: SupplyProcessor<S>,
    withdraw: WithdrawProcessor<S>,
    liquidation: LiquidationProcessor<S>,
    watchlist: Arc<WatchList>,
}

impl<S: StoragePort + 'static> ProcessorRegistry<S> {
    /// Create a new processor registry
    pub fn new(
        storage: Arc<S>,
        protocol: ProtocolSettings,
        settings: IndexerSettings,
        watchlist: Arc<WatchList>,
    ) -> Self {
        let ctx = Arc::new(ProcessorContext::new(storage, protocol, settings));

        Self {
            borrow: BorrowProcessor::new(ctx.clone()),
            repay: RepayProcessor::new(ctx.clone()),
            supply: SupplyProcessor::new(ctx.clone()),
            withdraw: WithdrawProcessor::new(ctx.clone()),
            liquidation: LiquidationProcessor::new(ctx),
            watchlist,
        }
    }

    pub fn watchlist(&self) -> &Arc<WatchList> {
        &self.watchlist
    }

    /// Route a decoded event to the appropriate processor
    pub async fn process_event(&self, event: &LendingEvent) -> IndexerResult<EventOutcome> {
        let meta = &event.meta;
        let kind = event.kind();

        match &event.payload {
            EventPayload::Borrow(params) => {
                self.borrow.process(meta, params).await?;
            }
            EventPayload::Repay(params) => {
                self.repay.process(meta, params).await?;
            }
            EventPayload::Supply(params) => {
                self.supply.process(meta, params).await?;
            }
            EventPayload::Withdraw(params) => {
                self.withdraw.process(meta, params).await?;
            }
            EventPayload::LiquidationCall(params) => {
                self.liquidation.process(meta, params).await?;
            }
            EventPayload::IsolationModeTotalDebtUpdated(_)
            | EventPayload::RebalanceStableBorrowRate(_)
            | EventPayload::SwapBorrowRateMode(_) => {
                debug!("{} at {}#{} has no state effect", kind, meta.tx_hash, meta.log_index);
                return Ok(EventOutcome::Ignored(kind));
            }
            EventPayload::AddressesProviderRegistered(params) => {
                let newly_watched = self.watchlist.register(params.addresses_provider).await;
                return Ok(EventOutcome::Registered {
                    address: params.addresses_provider,
                    newly_watched,
                });
            }
        }

        Ok(EventOutcome::Applied(kind))
    }
}
