//! Immutable per-log event records

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::core::{Entity, EntityKind};

/// Marker for entities written once per on-chain log
pub trait EventRecord: Entity {}

/// Interest rate mode code carried by borrow logs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterestRateMode {
    None,
    Stable,
    Variable,
    Other(u8),
}

impl From<u8> for InterestRateMode {
    fn from(code: u8) -> Self {
        match code {
            0 => InterestRateMode::None,
            1 => InterestRateMode::Stable,
            2 => InterestRateMode::Variable,
            other => InterestRateMode::Other(other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorrowRecord {
    pub id: String,
    pub protocol: String,
    pub market: String,
    pub borrower: String,
    pub on_behalf_of: String,
    pub amount: BigDecimal,
    pub borrow_rate: BigDecimal,
    pub interest_rate_mode: InterestRateMode,
    pub block_number: i32,
    pub block_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepayRecord {
    pub id: String,
    pub protocol: String,
    pub market: String,
    pub borrower: String,
    pub repayer: String,
    pub amount: BigDecimal,
    pub use_a_tokens: bool,
    pub block_number: i32,
    pub block_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositRecord {
    pub id: String,
    pub protocol: String,
    pub market: String,
    pub asset: Option<String>,
    /// Depositing account
    pub from: String,
    /// Receiving market
    pub to: String,
    pub on_behalf_of: String,
    pub amount: BigDecimal,
    pub referral_code: i32,
    pub block_number: i32,
    pub block_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawRecord {
    pub id: String,
    pub protocol: String,
    pub market: String,
    pub asset: Option<String>,
    /// Account whose supply is withdrawn
    pub account: String,
    /// Market the funds leave
    pub from: String,
    /// Account receiving the funds
    pub to: String,
    pub amount: BigDecimal,
    pub block_number: i32,
    pub block_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidationRecord {
    pub id: String,
    pub protocol: String,
    pub market: String,
    pub asset: Option<String>,
    pub collateral_asset: String,
    pub debt_asset: String,
    /// Debt covered by the liquidator
    pub amount: BigDecimal,
    pub collateral_amount: BigDecimal,
    pub liquidator: String,
    /// Liquidated account
    pub from: String,
    pub to: String,
    pub received: BigDecimal,
    pub receive_a_token: bool,
    pub block_number: i32,
    pub block_time: i32,
}

macro_rules! event_record {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }

        impl EventRecord for $ty {}
    };
}

event_record!(BorrowRecord, EntityKind::Borrow);
event_record!(RepayRecord, EntityKind::Repay);
event_record!(DepositRecord, EntityKind::Deposit);
event_record!(WithdrawRecord, EntityKind::Withdraw);
event_record!(LiquidationRecord, EntityKind::Liquidation);
