//! Account domain model

use serde::{Deserialize, Serialize};

use crate::core::{Entity, EntityKind};

/// An on-chain user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    /// Set by the first borrow and never cleared
    pub has_borrowed: bool,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_borrowed: false,
        }
    }

    /// Flag the account as a borrower. Returns true if this changed anything.
    pub fn mark_borrowed(&mut self) -> bool {
        let changed = !self.has_borrowed;
        self.has_borrowed = true;
        changed
    }
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> &str {
        &self.id
    }
}
