//! Account repository

use std::sync::Arc;
use tracing::debug;

use crate::core::{IndexerResult, StoragePort};
use crate::domain::models::Account;

pub struct AccountRepository<S: StoragePort> {
    storage: Arc<S>,
}

impl<S: StoragePort> AccountRepository<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Load the account, creating and persisting a blank one on first sight
    pub async fn get_or_create(&self, id: &str) -> IndexerResult<Account> {
        if let Some(account) = self.storage.load::<Account>(id).await? {
            return Ok(account);
        }

        let account = Account::new(id);
        self.storage.save(&account).await?;
        debug!("Created account {}", id);
        Ok(account)
    }

    pub async fn save(&self, account: &Account) -> IndexerResult<()> {
        self.storage.save(account).await
    }
}
