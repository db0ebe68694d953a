//! Core domain types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::IndexerError;

/// Decode a `0x`-prefixed (or bare) hex string into a fixed-size byte array.
fn decode_fixed_hex<const N: usize>(kind: &'static str, value: &str) -> Result<[u8; N], IndexerError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| IndexerError::InvalidHex {
        kind,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    Ok(out)
}

/// 20-byte account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Address whose every byte is `byte`, handy for fixtures
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<20>("address", s).map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 32-byte transaction hash
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 32])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

impl FromStr for TxHash {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<32>("transaction hash", s).map(Self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Block information context
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: u64,
}

impl BlockInfo {
    pub fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }

    /// Block number narrowed to the 32-bit column stored on event records.
    /// Values past `i32::MAX` saturate.
    pub fn number_i32(&self) -> i32 {
        i32::try_from(self.number).unwrap_or(i32::MAX)
    }

    /// Block timestamp narrowed to the 32-bit column stored on event records
    pub fn timestamp_i32(&self) -> i32 {
        i32::try_from(self.timestamp).unwrap_or(i32::MAX)
    }
}

/// Log coordinates shared by every decoded event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventMeta {
    /// Contract that emitted the log
    pub address: Address,
    pub tx_hash: TxHash,
    pub log_index: u64,
    pub block: BlockInfo,
}

impl EventMeta {
    pub fn new(address: Address, tx_hash: TxHash, log_index: u64, block: BlockInfo) -> Self {
        Self {
            address,
            tx_hash,
            log_index,
            block,
        }
    }
}

/// Every entity kind the store knows about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Protocol,
    Market,
    Account,
    Position,
    PositionTransaction,
    Borrow,
    Repay,
    Deposit,
    Withdraw,
    Liquidation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Protocol,
        EntityKind::Market,
        EntityKind::Account,
        EntityKind::Position,
        EntityKind::PositionTransaction,
        EntityKind::Borrow,
        EntityKind::Repay,
        EntityKind::Deposit,
        EntityKind::Withdraw,
        EntityKind::Liquidation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Protocol => "protocols",
            EntityKind::Market => "markets",
            EntityKind::Account => "accounts",
            EntityKind::Position => "positions",
            EntityKind::PositionTransaction => "position_transactions",
            EntityKind::Borrow => "borrows",
            EntityKind::Repay => "repays",
            EntityKind::Deposit => "deposits",
            EntityKind::Withdraw => "withdraws",
            EntityKind::Liquidation => "liquidations",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
