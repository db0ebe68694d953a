//! Core trait abstractions (Ports in Hexagonal Architecture)

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::error::IndexerResult;
use super::types::EntityKind;

/// A persisted record addressed by a stable string key
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Which keyspace the entity lives in
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

/// Storage port - the load/save contract the reconciliation core relies on.
///
/// Implementations must make each `load` and each `save` atomic per key.
/// Read-modify-write sequences are serialized by the caller.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Load an entity by key
    async fn load<E>(&self, id: &str) -> IndexerResult<Option<E>>
    where
        E: Entity;

    /// Insert or overwrite an entity under its own key
    async fn save<E>(&self, entity: &E) -> IndexerResult<()>
    where
        E: Entity;

    /// Write two entities in one atomic step: either both land or neither does
    async fn save_pair<A, B>(&self, first: &A, second: &B) -> IndexerResult<()>
    where
        A: Entity,
        B: Entity;

    /// Health check
    async fn health_check(&self) -> IndexerResult<StorageHealth>;
}

/// Storage health information
#[derive(Debug, Clone)]
pub struct StorageHealth {
    pub backend: &'static str,
    pub overall: bool,
}

impl StorageHealth {
    pub fn healthy(backend: &'static str) -> Self {
        Self {
            backend,
            overall: true,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.overall
    }
}
