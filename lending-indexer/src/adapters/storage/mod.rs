//! Storage adapters
//!
//! Backends implementing the StoragePort trait, plus a unified adapter
//! that picks one of them from configuration.

pub mod memory;
pub mod rocksdb;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::{Entity, EntityKind, IndexerResult, StorageHealth, StoragePort};

pub use memory::MemoryStore;
pub use self::rocksdb::RocksDBStore;

/// Unified storage adapter over the configured backend
pub enum StorageAdapter {
    Memory(MemoryStore),
    RocksDB(RocksDBStore),
}

impl StorageAdapter {
    /// Open the backend selected in `config`
    pub async fn new(config: &StorageConfig) -> IndexerResult<Self> {
        let adapter = match config.backend {
            StorageBackend::Memory => StorageAdapter::Memory(MemoryStore::new()),
            StorageBackend::RocksDB => StorageAdapter::RocksDB(RocksDBStore::open(&config.rocksdb).await?),
        };

        info!("Storage backend initialized: {}", adapter.backend_name());
        Ok(adapter)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageAdapter::Memory(_) => "memory",
            StorageAdapter::RocksDB(_) => "rocksdb",
        }
    }

    /// Exact number of entities stored for `kind`. On RocksDB this scans
    /// the column family.
    pub async fn count(&self, kind: EntityKind) -> IndexerResult<usize> {
        match self {
            StorageAdapter::Memory(store) => Ok(store.count(kind).await),
            StorageAdapter::RocksDB(store) => store.count(kind),
        }
    }

    /// Cheap entity count for summaries; RocksDB returns its key estimate
    pub async fn approximate_count(&self, kind: EntityKind) -> IndexerResult<u64> {
        match self {
            StorageAdapter::Memory(store) => Ok(store.count(kind).await as u64),
            StorageAdapter::RocksDB(store) => store.approximate_count(kind),
        }
    }
}

#[async_trait]
impl StoragePort for StorageAdapter {
    async fn load<E>(&self, id: &str) -> IndexerResult<Option<E>>
    where
        E: Entity,
    {
        match self {
            StorageAdapter::Memory(store) => store.load(id).await,
            StorageAdapter::RocksDB(store) => store.load(id).await,
        }
    }

    async fn save<E>(&self, entity: &E) -> IndexerResult<()>
    where
        E: Entity,
    {
        match self {
            StorageAdapter::Memory(store) => store.save(entity).await,
            StorageAdapter::RocksDB(store) => store.save(entity).await,
        }
    }

    async fn save_pair<A, B>(&self, first: &A, second: &B) -> IndexerResult<()>
    where
        A: Entity,
        B: Entity,
    {
        match self {
            StorageAdapter::Memory(store) => store.save_pair(first, second).await,
            StorageAdapter::RocksDB(store) => store.save_pair(first, second).await,
        }
    }

    async fn health_check(&self) -> IndexerResult<StorageHealth> {
        match self {
            StorageAdapter::Memory(store) => store.health_check().await,
            StorageAdapter::RocksDB(store) => store.health_check().await,
        }
    }
}
