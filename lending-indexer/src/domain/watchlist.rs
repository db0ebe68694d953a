//! Addresses whose logs the chain collaborator should deliver
//!
//! Factory events register new deployments at runtime; the subscription
//! side consults this list to decide which contracts to follow.

use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::info;

use crate::core::Address;

#[derive(Debug, Default)]
pub struct WatchList {
    addresses: RwLock<BTreeSet<Address>>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addresses(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self {
            addresses: RwLock::new(addresses.into_iter().collect()),
        }
    }

    /// Start watching `address`. Returns false if it was already watched.
    pub async fn register(&self, address: Address) -> bool {
        let inserted = self.addresses.write().await.insert(address);
        if inserted {
            info!("Watching new event source {}", address);
        }
        inserted
    }

    pub async fn is_watched(&self, address: &Address) -> bool {
        self.addresses.read().await.contains(address)
    }

    /// Snapshot of every watched address, in ascending order
    pub async fn addresses(&self) -> Vec<Address> {
        self.addresses.read().await.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_is_idempotent() {
        let list = WatchList::new();
        let provider = Address::repeat_byte(0x42);

        assert!(!list.is_watched(&provider).await);
        assert!(list.register(provider).await);
        assert!(!list.register(provider).await);
        assert!(list.is_watched(&provider).await);
        assert_eq!(list.addresses().await, vec![provider]);
    }
}
