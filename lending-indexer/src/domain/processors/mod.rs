//! Domain processors
//!
//! One processor per pool event kind. Each composes the identity rules,
//! the get-or-create repositories, the position ledger and the event
//! recorder into the state changes for that kind.

mod borrow;
mod liquidation;
mod registry;
mod repay;
mod supply;
mod withdraw;

pub use borrow::BorrowProcessor;
pub use liquidation::LiquidationProcessor;
pub use registry::{EventOutcome, ProcessorRegistry};
pub use repay::RepayProcessor;
pub use supply::SupplyProcessor;
pub use withdraw::WithdrawProcessor;

use std::sync::Arc;

use crate::config::{IndexerSettings, ProtocolSettings};
use crate::core::StoragePort;
use crate::domain::recorder::EventRecorder;
use crate::domain::repositories::Repositories;

/// State shared by every processor
pub struct ProcessorContext<S: StoragePort> {
    pub repos: Repositories<S>,
    pub recorder: EventRecorder<S>,
    pub settings: IndexerSettings,
}

impl<S: StoragePort> ProcessorContext<S> {
    pub fn new(storage: Arc<S>, protocol: ProtocolSettings, settings: IndexerSettings) -> Self {
        Self {
            repos: Repositories::new(storage.clone(), protocol),
            recorder: EventRecorder::new(storage),
            settings,
        }
    }
}
