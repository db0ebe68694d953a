//! In-memory storage backend

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::core::{Entity, EntityKind, IndexerResult, StorageHealth, StoragePort};

/// HashMap-backed store holding JSON-encoded entities.
///
/// Entities go through the same serialization as the persistent backend so
/// tests exercise identical round-trips.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(EntityKind, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities stored for `kind`
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.entries
            .read()
            .await
            .keys()
            .filter(|(entry_kind, _)| *entry_kind == kind)
            .count()
    }

    /// Keys stored for `kind`, sorted
    pub async fn ids(&self, kind: EntityKind) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .await
            .keys()
            .filter(|(entry_kind, _)| *entry_kind == kind)
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl StoragePort for MemoryStore {
    async fn load<E>(&self, id: &str) -> IndexerResult<Option<E>>
    where
        E: Entity,
    {
        let entries = self.entries.read().await;
        match entries.get(&(E::KIND, id.to_string())) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    async fn save<E>(&self, entity: &E) -> IndexerResult<()>
    where
        E: Entity,
    {
        let bytes = serde_json::to_vec(entity)?;
        self.entries
            .write()
            .await
            .insert((E::KIND, entity.id().to_string()), bytes);

        debug!("Stored {} {}", E::KIND, entity.id());
        Ok(())
    }

    async fn save_pair<A, B>(&self, first: &A, second: &B) -> IndexerResult<()>
    where
        A: Entity,
        B: Entity,
    {
        // Encode both before taking the lock so a failure writes nothing
        let first_bytes = serde_json::to_vec(first)?;
        let second_bytes = serde_json::to_vec(second)?;

        let mut entries = self.entries.write().await;
        entries.insert((A::KIND, first.id().to_string()), first_bytes);
        entries.insert((B::KIND, second.id().to_string()), second_bytes);

        debug!("Stored {} {} with {} {}", A::KIND, first.id(), B::KIND, second.id());
        Ok(())
    }

    async fn health_check(&self) -> IndexerResult<StorageHealth> {
        Ok(StorageHealth::healthy("memory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Account, Market};

    #[tokio::test]
    async fn kinds_are_isolated() {
        let store = MemoryStore::new();
        store.save(&Account::new("0x01")).await.unwrap();
        store.save(&Market::new("0x01", "AAVEV3", None)).await.unwrap();

        assert_eq!(store.count(EntityKind::Account).await, 1);
        assert_eq!(store.count(EntityKind::Market).await, 1);

        let account: Option<Account> = store.load("0x01").await.unwrap();
        assert_eq!(account, Some(Account::new("0x01")));

        let missing: Option<Account> = store.load("0x02").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn save_pair_writes_both() {
        let store = MemoryStore::new();
        store
            .save_pair(&Account::new("0x03"), &Market::new("0x04", "AAVEV3", None))
            .await
            .unwrap();

        assert_eq!(store.ids(EntityKind::Account).await, vec!["0x03".to_string()]);
        assert_eq!(store.ids(EntityKind::Market).await, vec!["0x04".to_string()]);
    }
}
