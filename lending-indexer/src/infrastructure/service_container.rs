//! Service container for dependency injection

use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::adapters::storage::StorageAdapter;
use crate::config::IndexerConfig;
use crate::core::{Address, IndexerError, IndexerResult, StoragePort};
use crate::domain::{ProcessorRegistry, WatchList};
use crate::services::EventPipeline;

/// Service container managing all dependencies
pub struct ServiceContainer {
    /// Configuration
    pub config: IndexerConfig,

    /// Storage adapter over the configured backend
    pub storage: Arc<StorageAdapter>,

    /// Event sources announced so far
    pub watchlist: Arc<WatchList>,

    /// Processor registry
    pub processors: Arc<ProcessorRegistry<StorageAdapter>>,
}

impl ServiceContainer {
    /// Initialize the service container with all dependencies
    pub async fn new(config: IndexerConfig) -> IndexerResult<Self> {
        info!("Initializing service container");

        let storage = Arc::new(StorageAdapter::new(&config.storage).await?);

        let seeds = config
            .protocol
            .deployments
            .keys()
            .map(|address| Address::from_str(address))
            .collect::<IndexerResult<Vec<_>>>()?;
        let watchlist = Arc::new(WatchList::with_addresses(seeds));

        let processors = Arc::new(ProcessorRegistry::new(
            storage.clone(),
            config.protocol.clone(),
            config.indexer.clone(),
            watchlist.clone(),
        ));

        info!("Processor registry initialized");

        Ok(Self {
            config,
            storage,
            watchlist,
            processors,
        })
    }

    /// Pipeline applying events through this container's processors
    pub fn pipeline(&self) -> EventPipeline<StorageAdapter> {
        EventPipeline::new(self.processors.clone())
    }

    /// Perform health check on all services
    pub async fn health_check(&self) -> IndexerResult<()> {
        info!("Performing health check");

        let health = self.storage.health_check().await?;

        if !health.is_healthy() {
            return Err(IndexerError::Configuration(format!(
                "Health check failed: backend={}",
                health.backend
            )));
        }

        info!("All services healthy");
        Ok(())
    }
}
