//! Get-or-create repositories, one per reference entity kind
//!
//! Every repository persists a freshly created entity before returning it,
//! so an event referencing something not yet seen simply brings it into
//! existence with default values.

mod account;
mod market;
mod position;
mod protocol;

pub use account::AccountRepository;
pub use market::MarketRepository;
pub use position::PositionRepository;
pub use protocol::ProtocolRepository;

use bigdecimal::BigDecimal;
use std::sync::Arc;

use crate::config::ProtocolSettings;
use crate::core::StoragePort;

/// All repositories over one shared store
pub struct Repositories<S: StoragePort> {
    pub accounts: AccountRepository<S>,
    pub markets: MarketRepository<S>,
    pub protocols: ProtocolRepository<S>,
    pub positions: PositionRepository<S>,
}

impl<S: StoragePort> Repositories<S> {
    pub fn new(storage: Arc<S>, settings: ProtocolSettings) -> Self {
        let liquidity_rate = settings.default_liquidity_rate.map(BigDecimal::from);

        Self {
            accounts: AccountRepository::new(storage.clone()),
            markets: MarketRepository::new(storage.clone(), liquidity_rate),
            protocols: ProtocolRepository::new(storage.clone(), settings),
            positions: PositionRepository::new(storage),
        }
    }
}
