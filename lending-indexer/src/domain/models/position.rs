//! Position domain models

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::core::{Entity, EntityKind, EventMeta, TxHash};
use crate::domain::identity;

/// Running state of one account in one market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    // Identity
    pub id: String,
    pub market: String,
    pub account: String,

    /// Block of the most recently processed event (last write, not max)
    pub accrual_block_number: u64,

    // Balances
    pub a_token_balance: BigDecimal,
    pub account_borrow_index: BigDecimal,
    pub stored_borrow_balance: BigDecimal,

    // Accumulators
    pub total_underlying_supplied: BigDecimal,
    pub total_underlying_redeemed: BigDecimal,
    pub total_underlying_borrowed: BigDecimal,
    pub total_underlying_repaid: BigDecimal,

    pub entered_market: bool,
}

impl Position {
    /// Zeroed position for a (market, account) pair never seen before
    pub fn new(id: impl Into<String>, market: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            market: market.into(),
            account: account.into(),
            accrual_block_number: 0,
            a_token_balance: BigDecimal::zero(),
            account_borrow_index: BigDecimal::zero(),
            stored_borrow_balance: BigDecimal::zero(),
            total_underlying_supplied: BigDecimal::zero(),
            total_underlying_redeemed: BigDecimal::zero(),
            total_underlying_borrowed: BigDecimal::zero(),
            total_underlying_repaid: BigDecimal::zero(),
            entered_market: false,
        }
    }

    /// Add a delta to the accumulator it targets
    pub fn accumulate(&mut self, delta: &PositionDelta) {
        let (field, amount) = match delta {
            PositionDelta::Supplied(amount) => (&mut self.total_underlying_supplied, amount),
            PositionDelta::Redeemed(amount) => (&mut self.total_underlying_redeemed, amount),
            PositionDelta::Borrowed(amount) => (&mut self.total_underlying_borrowed, amount),
            PositionDelta::Repaid(amount) => (&mut self.total_underlying_repaid, amount),
        };
        *field += amount;
    }
}

impl Entity for Position {
    const KIND: EntityKind = EntityKind::Position;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Amount moved by one event, tagged with the accumulator it feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionDelta {
    Supplied(BigDecimal),
    Redeemed(BigDecimal),
    Borrowed(BigDecimal),
    Repaid(BigDecimal),
}

/// Marker proving one log has already been folded into a position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionTransaction {
    pub id: String,
    pub position: String,
    pub tx_hash: TxHash,
    pub timestamp: u64,
    pub block: u64,
    pub log_index: u64,
}

impl PositionTransaction {
    /// Marker for the log described by `meta` against `position_id`
    pub fn for_event(position_id: &str, meta: &EventMeta) -> Self {
        Self {
            id: identity::position_transaction_id(position_id, &meta.tx_hash, meta.log_index),
            position: position_id.to_string(),
            tx_hash: meta.tx_hash,
            timestamp: meta.block.timestamp,
            block: meta.block.number,
            log_index: meta.log_index,
        }
    }
}

impl Entity for PositionTransaction {
    const KIND: EntityKind = EntityKind::PositionTransaction;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_position_is_zeroed() {
        let position = Position::new("m-a", "m", "a");
        assert_eq!(position.accrual_block_number, 0);
        assert!(position.total_underlying_borrowed.is_zero());
        assert!(position.total_underlying_repaid.is_zero());
        assert!(position.total_underlying_supplied.is_zero());
        assert!(position.total_underlying_redeemed.is_zero());
        assert!(!position.entered_market);
    }

    #[test]
    fn accumulate_targets_one_field() {
        let mut position = Position::new("m-a", "m", "a");
        position.accumulate(&PositionDelta::Repaid(BigDecimal::from(7)));
        position.accumulate(&PositionDelta::Repaid(BigDecimal::from(3)));

        assert_eq!(position.total_underlying_repaid, BigDecimal::from(10));
        assert!(position.total_underlying_borrowed.is_zero());
    }
}
