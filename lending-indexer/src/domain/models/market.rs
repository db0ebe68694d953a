//! Market domain models

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::core::{Entity, EntityKind};

/// One lending pool/reserve, keyed by its contract address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    // Identity
    pub id: String,
    pub protocol: String,
    pub name: Option<String>,

    // Asset references
    pub deposit_asset: Option<String>,
    pub borrow_asset: Option<String>,
    pub a_token_address: Option<String>,
    pub stable_debt_token_address: Option<String>,
    pub variable_debt_token_address: Option<String>,
    pub interest_rate_strategy_address: Option<String>,

    // Rate and index snapshot
    pub liquidity_index: Option<BigDecimal>,
    pub current_liquidity_rate: Option<BigDecimal>,
    pub variable_borrow_index: Option<BigDecimal>,
    pub current_variable_borrow_rate: Option<BigDecimal>,
    pub current_stable_borrow_rate: Option<BigDecimal>,
    pub liquidity_rate: Option<BigDecimal>,

    // Accrual bookkeeping
    pub last_update_timestamp: i32,
    pub accrued_to_treasury: Option<BigDecimal>,
    pub unbacked: Option<BigDecimal>,
    pub isolation_mode_total_debt: Option<BigDecimal>,
}

impl Market {
    /// Fresh market with every optional reference unset.
    ///
    /// `liquidity_rate` is not read from chain; it is seeded from the
    /// configured placeholder.
    pub fn new(id: impl Into<String>, protocol: impl Into<String>, liquidity_rate: Option<BigDecimal>) -> Self {
        Self {
            id: id.into(),
            protocol: protocol.into(),
            name: None,
            deposit_asset: None,
            borrow_asset: None,
            a_token_address: None,
            stable_debt_token_address: None,
            variable_debt_token_address: None,
            interest_rate_strategy_address: None,
            liquidity_index: None,
            current_liquidity_rate: None,
            variable_borrow_index: None,
            current_variable_borrow_rate: None,
            current_stable_borrow_rate: None,
            liquidity_rate,
            last_update_timestamp: 0,
            accrued_to_treasury: None,
            unbacked: None,
            isolation_mode_total_debt: None,
        }
    }
}

impl Entity for Market {
    const KIND: EntityKind = EntityKind::Market;

    fn id(&self) -> &str {
        &self.id
    }
}
