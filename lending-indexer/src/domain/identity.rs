//! Deterministic entity keys
//!
//! Every key is derived from on-chain coordinates only, so duplicate or
//! reordered deliveries of the same log always land on the same record.

use crate::core::{Address, TxHash};

/// How Borrow records are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorrowIdPolicy {
    /// `txHash-logIndex`, like every other event record
    #[default]
    TxHashAndLogIndex,
    /// `txHash` alone; collapses multiple borrows emitted by one transaction
    TxHashOnly,
}

/// Key of an Account or Market: the canonical lowercase hex address
pub fn entity_id(address: &Address) -> String {
    address.to_string()
}

/// Key of the Position for a (market, account) pair
pub fn position_id(market_id: &str, account_id: &str) -> String {
    format!("{}-{}", market_id, account_id)
}

/// Key of the marker guarding one log's effect on one position
pub fn position_transaction_id(position_id: &str, tx_hash: &TxHash, log_index: u64) -> String {
    format!("{}-{}-{}", position_id, tx_hash, log_index)
}

/// Key of an immutable event record
pub fn event_id(tx_hash: &TxHash, log_index: u64) -> String {
    format!("{}-{}", tx_hash, log_index)
}

/// Key of a Borrow record under the configured policy
pub fn borrow_event_id(tx_hash: &TxHash, log_index: u64, policy: BorrowIdPolicy) -> String {
    match policy {
        BorrowIdPolicy::TxHashAndLogIndex => event_id(tx_hash, log_index),
        BorrowIdPolicy::TxHashOnly => tx_hash.to_string(),
    }
}
