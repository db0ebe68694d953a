//! Market repository

use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::debug;

use crate::core::{IndexerResult, StoragePort};
use crate::domain::models::Market;

pub struct MarketRepository<S: StoragePort> {
    storage: Arc<S>,
    default_liquidity_rate: Option<BigDecimal>,
}

impl<S: StoragePort> MarketRepository<S> {
    pub fn new(storage: Arc<S>, default_liquidity_rate: Option<BigDecimal>) -> Self {
        Self {
            storage,
            default_liquidity_rate,
        }
    }

    /// Load the market, creating it under `protocol_id` on first sight.
    /// An existing market keeps the protocol it was created with.
    pub async fn get_or_create(&self, id: &str, protocol_id: &str) -> IndexerResult<Market> {
        if let Some(market) = self.storage.load::<Market>(id).await? {
            return Ok(market);
        }

        let market = Market::new(id, protocol_id, self.default_liquidity_rate.clone());
        self.storage.save(&market).await?;
        debug!("Created market {} under protocol {}", id, protocol_id);
        Ok(market)
    }
}
