//! Decoded pool events delivered by the chain collaborator
//!
//! The decoder upstream hands over fully typed records; the indexer never
//! touches raw log data. On the wire (the replay binary's input) an event is
//! one JSON object per line:
//!
//! ```json
//! {"meta": {"address": "0x..", "tx_hash": "0x..", "log_index": 3,
//!           "block": {"number": 100, "timestamp": 1700000000}},
//!  "payload": {"type": "borrow", "reserve": "0x..", ...}}
//! ```

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{IndexerError, IndexerResult};
use super::types::{Address, EventMeta};

/// Pool `Borrow` log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorrowParams {
    pub reserve: Address,
    pub user: Address,
    pub on_behalf_of: Address,
    pub amount: BigDecimal,
    pub interest_rate_mode: u8,
    pub borrow_rate: BigDecimal,
    #[serde(default)]
    pub referral_code: u16,
}

/// Pool `Repay` log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepayParams {
    pub reserve: Address,
    pub user: Address,
    pub repayer: Address,
    pub amount: BigDecimal,
    pub use_a_tokens: bool,
}

/// Pool `Supply` log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyParams {
    pub reserve: Address,
    pub user: Address,
    pub on_behalf_of: Address,
    pub amount: BigDecimal,
    #[serde(default)]
    pub referral_code: u16,
}

/// Pool `Withdraw` log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawParams {
    pub reserve: Address,
    pub user: Address,
    pub to: Address,
    pub amount: BigDecimal,
}

/// Pool `LiquidationCall` log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidationCallParams {
    pub collateral_asset: Address,
    pub debt_asset: Address,
    pub user: Address,
    pub debt_to_cover: BigDecimal,
    pub liquidated_collateral_amount: BigDecimal,
    pub liquidator: Address,
    #[serde(default)]
    pub receive_a_token: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IsolationModeTotalDebtUpdatedParams {
    pub asset: Address,
    pub total_debt: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebalanceStableBorrowRateParams {
    pub reserve: Address,
    pub user: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapBorrowRateModeParams {
    pub reserve: Address,
    pub user: Address,
    pub interest_rate_mode: u8,
}

/// Registry `AddressesProviderRegistered` log announcing a new pool deployment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressesProviderRegisteredParams {
    pub addresses_provider: Address,
    #[serde(default)]
    pub id: u64,
}

/// Kind-specific part of a decoded event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Borrow(BorrowParams),
    Repay(RepayParams),
    Supply(SupplyParams),
    Withdraw(WithdrawParams),
    LiquidationCall(LiquidationCallParams),
    IsolationModeTotalDebtUpdated(IsolationModeTotalDebtUpdatedParams),
    RebalanceStableBorrowRate(RebalanceStableBorrowRateParams),
    SwapBorrowRateMode(SwapBorrowRateModeParams),
    AddressesProviderRegistered(AddressesProviderRegisteredParams),
}

/// Discriminant of [`EventPayload`], used for routing stats and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Borrow,
    Repay,
    Supply,
    Withdraw,
    LiquidationCall,
    IsolationModeTotalDebtUpdated,
    RebalanceStableBorrowRate,
    SwapBorrowRateMode,
    AddressesProviderRegistered,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Borrow => "Borrow",
            EventKind::Repay => "Repay",
            EventKind::Supply => "Supply",
            EventKind::Withdraw => "Withdraw",
            EventKind::LiquidationCall => "LiquidationCall",
            EventKind::IsolationModeTotalDebtUpdated => "IsolationModeTotalDebtUpdated",
            EventKind::RebalanceStableBorrowRate => "RebalanceStableBorrowRate",
            EventKind::SwapBorrowRateMode => "SwapBorrowRateMode",
            EventKind::AddressesProviderRegistered => "AddressesProviderRegistered",
        };
        f.write_str(name)
    }
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Borrow(_) => EventKind::Borrow,
            EventPayload::Repay(_) => EventKind::Repay,
            EventPayload::Supply(_) => EventKind::Supply,
            EventPayload::Withdraw(_) => EventKind::Withdraw,
            EventPayload::LiquidationCall(_) => EventKind::LiquidationCall,
            EventPayload::IsolationModeTotalDebtUpdated(_) => EventKind::IsolationModeTotalDebtUpdated,
            EventPayload::RebalanceStableBorrowRate(_) => EventKind::RebalanceStableBorrowRate,
            EventPayload::SwapBorrowRateMode(_) => EventKind::SwapBorrowRateMode,
            EventPayload::AddressesProviderRegistered(_) => EventKind::AddressesProviderRegistered,
        }
    }
}

/// One decoded log: where it came from plus what it says
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LendingEvent {
    pub meta: EventMeta,
    pub payload: EventPayload,
}

impl LendingEvent {
    pub fn new(meta: EventMeta, payload: EventPayload) -> Self {
        Self { meta, payload }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Parse one line of newline-delimited JSON
    pub fn from_json_line(line: &str) -> IndexerResult<Self> {
        serde_json::from_str(line.trim()).map_err(|e| IndexerError::Deserialization(e.to_string()))
    }
}
