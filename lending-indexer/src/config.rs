//! Configuration management for the lending indexer

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use validator::Validate;

use crate::domain::identity::BorrowIdPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct IndexerConfig {
    #[validate]
    pub protocol: ProtocolSettings,
    #[validate]
    pub storage: StorageConfig,
    #[validate]
    pub indexer: IndexerSettings,
    pub monitoring: MonitoringConfig,
}

/// Static protocol constants, the swap-in point for future on-chain reads
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProtocolSettings {
    #[validate(length(min = 1))]
    pub network: String,
    #[validate(length(min = 1))]
    pub protocol_type: String,
    #[validate(length(min = 1))]
    pub risk_type: String,
    /// Placeholder liquidity rate stamped on every new market
    pub default_liquidity_rate: Option<u64>,
    /// Protocol id assigned to pools missing from `deployments`
    #[validate(length(min = 1))]
    pub unknown_protocol_id: String,
    /// Pool contract address -> protocol id
    pub deployments: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    RocksDB,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[validate]
    pub rocksdb: RocksDBConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RocksDBConfig {
    pub path: PathBuf,
    pub enable_compression: bool,
    #[validate(range(min = 100, max = 10000))]
    pub max_open_files: i32,
    #[validate(range(min = 16, max = 2048))]
    pub write_buffer_size_mb: usize,
    #[validate(range(min = 2, max = 16))]
    pub max_write_buffer_number: i32,
    #[validate(range(min = 32, max = 4096))]
    pub block_cache_size_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IndexerSettings {
    #[validate(range(min = 1, max = 100000))]
    pub channel_capacity: usize,
    /// Fold Supply/Withdraw amounts into the position ledger
    pub accumulate_supply_and_redeem: bool,
    /// Key Borrow records by transaction hash alone
    pub legacy_borrow_ids: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        let mut deployments = HashMap::new();
        deployments.insert(
            "0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2".to_string(),
            "AAVEV3".to_string(),
        );

        Self {
            network: "mainnet".to_string(),
            protocol_type: "Pooled".to_string(),
            risk_type: "Global".to_string(),
            default_liquidity_rate: Some(50_000),
            unknown_protocol_id: "unknown".to_string(),
            deployments,
        }
    }
}

impl Default for RocksDBConfig {
    fn default() -> Self {
        Self {
            path: "./data/rocksdb".into(),
            enable_compression: true,
            max_open_files: 1000,
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            block_cache_size_mb: 256,
        }
    }
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            accumulate_supply_and_redeem: false,
            legacy_borrow_ids: false,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl IndexerSettings {
    pub fn borrow_id_policy(&self) -> BorrowIdPolicy {
        if self.legacy_borrow_ids {
            BorrowIdPolicy::TxHashOnly
        } else {
            BorrowIdPolicy::TxHashAndLogIndex
        }
    }
}

impl IndexerConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate_settings()?;
        Ok(config)
    }

    /// Ensure required directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        if self.storage.backend == StorageBackend::RocksDB {
            std::fs::create_dir_all(&self.storage.rocksdb.path)?;
        }
        Ok(())
    }

    /// Validate field ranges plus cross-field rules
    pub fn validate_settings(&self) -> Result<()> {
        self.validate()?;

        for (address, protocol) in &self.protocol.deployments {
            address
                .parse::<crate::core::Address>()
                .map_err(|e| anyhow::anyhow!("Invalid deployment address: {}", e))?;
            if protocol.is_empty() {
                return Err(anyhow::anyhow!("Deployment {} maps to an empty protocol id", address));
            }
        }
        Ok(())
    }
}
