//! Storage backend tests

use anyhow::Result;
use bigdecimal::BigDecimal;
use lending_indexer::adapters::{MemoryStore, StorageAdapter};
use lending_indexer::config::{
    IndexerSettings, ProtocolSettings, RocksDBConfig, StorageBackend, StorageConfig,
};
use lending_indexer::core::events::BorrowParams;
use lending_indexer::core::{
    Address, BlockInfo, EntityKind, EventMeta, EventPayload, LendingEvent, StoragePort, TxHash,
};
use lending_indexer::domain::identity;
use lending_indexer::domain::models::{Account, Market, Position};
use lending_indexer::domain::{ProcessorRegistry, WatchList};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;

fn rocksdb_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        backend: StorageBackend::RocksDB,
        rocksdb: RocksDBConfig {
            path: dir.path().to_path_buf(),
            enable_compression: true,
            max_open_files: 100,
            write_buffer_size_mb: 16,
            max_write_buffer_number: 2,
            block_cache_size_mb: 32,
        },
    }
}

fn borrow_event(tx: u8, log_index: u64, value: i64) -> LendingEvent {
    let pool = Address::from_str("0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2").unwrap();
    let borrower = Address::repeat_byte(0xa1);
    LendingEvent::new(
        EventMeta::new(pool, TxHash::repeat_byte(tx), log_index, BlockInfo::new(100 + tx as u64, 1_700_000_000)),
        EventPayload::Borrow(BorrowParams {
            reserve: Address::repeat_byte(0xee),
            user: borrower,
            on_behalf_of: borrower,
            amount: BigDecimal::from(value),
            interest_rate_mode: 2,
            borrow_rate: BigDecimal::from(1),
            referral_code: 0,
        }),
    )
}

fn registry<S: StoragePort + 'static>(storage: Arc<S>) -> ProcessorRegistry<S> {
    ProcessorRegistry::new(
        storage,
        ProtocolSettings::default(),
        IndexerSettings::default(),
        Arc::new(WatchList::new()),
    )
}

fn alice_position_id() -> String {
    identity::position_id(
        "0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2",
        &identity::entity_id(&Address::repeat_byte(0xa1)),
    )
}

#[tokio::test]
async fn test_rocksdb_adapter_initialization() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let adapter = StorageAdapter::new(&rocksdb_config(&temp_dir)).await?;

    assert_eq!(adapter.backend_name(), "rocksdb");
    assert!(adapter.health_check().await?.is_healthy());
    for kind in EntityKind::ALL {
        assert_eq!(adapter.count(kind).await?, 0);
    }

    Ok(())
}

#[tokio::test]
async fn test_memory_adapter_initialization() -> Result<()> {
    let adapter = StorageAdapter::new(&StorageConfig::default()).await?;

    assert_eq!(adapter.backend_name(), "memory");
    assert!(adapter.health_check().await?.is_healthy());

    Ok(())
}

#[tokio::test]
async fn test_entities_isolated_by_kind() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let adapter = StorageAdapter::new(&rocksdb_config(&temp_dir)).await?;

    // Same id in two kinds must not collide
    adapter.save(&Account::new("0xshared")).await?;
    adapter.save(&Market::new("0xshared", "AAVEV3", None)).await?;

    assert!(adapter.load::<Account>("0xshared").await?.is_some());
    let market = adapter.load::<Market>("0xshared").await?.unwrap();
    assert_eq!(market.protocol, "AAVEV3");
    assert!(adapter.load::<Position>("0xshared").await?.is_none());

    assert_eq!(adapter.count(EntityKind::Account).await?, 1);
    assert_eq!(adapter.count(EntityKind::Market).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_decimal_precision_survives_storage() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let adapter = StorageAdapter::new(&rocksdb_config(&temp_dir)).await?;

    let huge = BigDecimal::from_str("115792089237316195423570985008687907853269984665640564039457.584007913129639935")?;
    let mut position = Position::new("p", "m", "a");
    position.total_underlying_borrowed = huge.clone();
    adapter.save(&position).await?;

    let loaded = adapter.load::<Position>("p").await?.unwrap();
    assert_eq!(loaded.total_underlying_borrowed, huge);

    Ok(())
}

#[tokio::test]
async fn test_replay_after_reopen_is_absorbed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = rocksdb_config(&temp_dir);

    {
        let storage = Arc::new(StorageAdapter::new(&config).await?);
        let registry = registry(storage.clone());
        registry.process_event(&borrow_event(1, 0, 100)).await?;
        registry.process_event(&borrow_event(2, 0, 25)).await?;
    }

    // Database lock is released once the first adapter drops
    let storage = Arc::new(StorageAdapter::new(&config).await?);
    let registry = registry(storage.clone());
    registry.process_event(&borrow_event(1, 0, 100)).await?;

    let position = storage.load::<Position>(&alice_position_id()).await?.unwrap();
    assert_eq!(position.total_underlying_borrowed, BigDecimal::from(125));
    assert_eq!(storage.count(EntityKind::Borrow).await?, 2);
    assert_eq!(storage.count(EntityKind::PositionTransaction).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_backends_agree() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let rocks = Arc::new(StorageAdapter::new(&rocksdb_config(&temp_dir)).await?);
    let memory = Arc::new(MemoryStore::new());

    let events = [borrow_event(1, 0, 10), borrow_event(1, 1, 20), borrow_event(1, 0, 10)];
    let rocks_registry = registry(rocks.clone());
    let memory_registry = registry(memory.clone());
    for event in &events {
        rocks_registry.process_event(event).await?;
        memory_registry.process_event(event).await?;
    }

    let from_rocks = rocks.load::<Position>(&alice_position_id()).await?;
    let from_memory = memory.load::<Position>(&alice_position_id()).await?;
    assert!(from_rocks.is_some());
    assert_eq!(from_rocks, from_memory);

    for kind in EntityKind::ALL {
        assert_eq!(rocks.count(kind).await?, memory.count(kind).await, "{} counts differ", kind);
    }

    Ok(())
}

#[tokio::test]
async fn test_approximate_count_without_scan() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let rocks = StorageAdapter::new(&rocksdb_config(&temp_dir)).await?;
    let memory = StorageAdapter::new(&StorageConfig::default()).await?;

    for adapter in [&rocks, &memory] {
        adapter.save(&Account::new("0x01")).await?;
        adapter.save(&Account::new("0x02")).await?;
        assert_eq!(adapter.approximate_count(EntityKind::Account).await?, 2);
        assert_eq!(adapter.approximate_count(EntityKind::Liquidation).await?, 0);
    }

    Ok(())
}
