//! End-to-end tests: NDJSON lines through the container's pipeline

use anyhow::Result;
use bigdecimal::BigDecimal;
use lending_indexer::adapters::StorageAdapter;
use lending_indexer::config::IndexerConfig;
use lending_indexer::core::{Address, EntityKind, IndexerError, LendingEvent, StoragePort};
use lending_indexer::domain::identity;
use lending_indexer::domain::models::Position;
use lending_indexer::services::{replay_stream, EventPipeline, PipelineStats};
use lending_indexer::ServiceContainer;
use std::io::Cursor;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};

const POOL: &str = "0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2";
const ALICE: &str = "0x00000000000000000000000000000000000000aa";
const KEEPER: &str = "0x00000000000000000000000000000000000000bb";
const PROVIDER: &str = "0x2f39d218133afab8f2b819b1066c7e434ad94e9e";

fn line(tx_byte: &str, log_index: u64, block: u64, payload: &str) -> String {
    format!(
        r#"{{"meta":{{"address":"{}","tx_hash":"0x{}","log_index":{},"block":{{"number":{},"timestamp":{}}}}},"payload":{}}}"#,
        POOL,
        tx_byte.repeat(32),
        log_index,
        block,
        1_672_000_000 + block,
        payload
    )
}

fn event_lines() -> Vec<String> {
    vec![
        line(
            "01",
            0,
            100,
            &format!(
                r#"{{"type":"supply","reserve":"{}","user":"{}","on_behalf_of":"{}","amount":"1000","referral_code":0}}"#,
                POOL, ALICE, ALICE
            ),
        ),
        line(
            "02",
            3,
            101,
            &format!(
                r#"{{"type":"borrow","reserve":"{}","user":"{}","on_behalf_of":"{}","amount":"400","interest_rate_mode":2,"borrow_rate":"31250000000000000000000000"}}"#,
                POOL, ALICE, ALICE
            ),
        ),
        line(
            "03",
            1,
            102,
            &format!(
                r#"{{"type":"rebalance_stable_borrow_rate","reserve":"{}","user":"{}"}}"#,
                POOL, ALICE
            ),
        ),
        line(
            "04",
            5,
            103,
            &format!(r#"{{"type":"addresses_provider_registered","addresses_provider":"{}","id":1}}"#, PROVIDER),
        ),
        line(
            "05",
            2,
            104,
            &format!(
                r#"{{"type":"repay","reserve":"{}","user":"{}","repayer":"{}","amount":"150","use_a_tokens":false}}"#,
                POOL, ALICE, ALICE
            ),
        ),
        line(
            "06",
            9,
            105,
            &format!(
                r#"{{"type":"liquidation_call","collateral_asset":"{}","debt_asset":"{}","user":"{}","debt_to_cover":"100","liquidated_collateral_amount":"110","liquidator":"{}"}}"#,
                POOL, POOL, ALICE, KEEPER
            ),
        ),
    ]
}

async fn run_lines(container: &ServiceContainer, lines: &[String]) -> Result<PipelineStats> {
    let (tx, rx) = EventPipeline::<StorageAdapter>::channel(container.config.indexer.channel_capacity);
    let pipeline = container.pipeline();
    let handle = tokio::spawn(async move { pipeline.run(rx).await });

    for raw in lines {
        tx.send(LendingEvent::from_json_line(raw)?).await?;
    }
    drop(tx);

    Ok(handle.await??)
}

#[tokio::test]
async fn test_pipeline_processes_stream() -> Result<()> {
    let container = ServiceContainer::new(IndexerConfig::default()).await?;
    container.health_check().await?;

    let stats = run_lines(&container, &event_lines()).await?;
    assert_eq!(
        stats,
        PipelineStats {
            applied: 4,
            ignored: 1,
            registrations: 1,
        }
    );
    assert_eq!(stats.total(), 6);

    let storage = &container.storage;
    assert_eq!(storage.count(EntityKind::Deposit).await?, 1);
    assert_eq!(storage.count(EntityKind::Borrow).await?, 1);
    assert_eq!(storage.count(EntityKind::Repay).await?, 1);
    assert_eq!(storage.count(EntityKind::Liquidation).await?, 1);
    assert_eq!(storage.count(EntityKind::Withdraw).await?, 0);
    assert_eq!(storage.count(EntityKind::Account).await?, 2);

    let position_id = identity::position_id(POOL, ALICE);
    let position = storage.load::<Position>(&position_id).await?.unwrap();
    assert_eq!(position.total_underlying_borrowed, BigDecimal::from(400));
    assert_eq!(position.total_underlying_repaid, BigDecimal::from(150));
    assert_eq!(position.accrual_block_number, 104);

    Ok(())
}

#[tokio::test]
async fn test_pipeline_replay_is_idempotent() -> Result<()> {
    let container = ServiceContainer::new(IndexerConfig::default()).await?;

    run_lines(&container, &event_lines()).await?;
    let mut reversed = event_lines();
    reversed.reverse();
    run_lines(&container, &reversed).await?;

    let storage = &container.storage;
    let position = storage
        .load::<Position>(&identity::position_id(POOL, ALICE))
        .await?
        .unwrap();
    assert_eq!(position.total_underlying_borrowed, BigDecimal::from(400));
    assert_eq!(position.total_underlying_repaid, BigDecimal::from(150));
    assert_eq!(storage.count(EntityKind::Borrow).await?, 1);
    assert_eq!(storage.count(EntityKind::PositionTransaction).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_registration_extends_watchlist() -> Result<()> {
    let container = ServiceContainer::new(IndexerConfig::default()).await?;
    let provider = Address::from_str(PROVIDER)?;
    let pool = Address::from_str(POOL)?;

    // Seeded from the configured deployments
    assert!(container.watchlist.is_watched(&pool).await);
    assert!(!container.watchlist.is_watched(&provider).await);

    let registration = event_lines().remove(3);
    let first = run_lines(&container, &[registration.clone()]).await?;
    let second = run_lines(&container, &[registration]).await?;

    assert_eq!(first.registrations, 1);
    assert_eq!(second.registrations, 1);
    assert!(container.watchlist.is_watched(&provider).await);
    assert_eq!(container.watchlist.addresses().await.len(), 2);

    Ok(())
}

#[test]
fn test_malformed_line_rejected() {
    assert!(LendingEvent::from_json_line("{\"meta\": {}}").is_err());
    assert!(LendingEvent::from_json_line("not json").is_err());

    let bad_address = line(
        "01",
        0,
        1,
        r#"{"type":"isolation_mode_total_debt_updated","asset":"0xzz","total_debt":"1"}"#,
    );
    assert!(LendingEvent::from_json_line(&bad_address).is_err());
}

#[tokio::test]
async fn test_replay_reads_to_end() -> Result<()> {
    let container = ServiceContainer::new(IndexerConfig::default()).await?;
    let input = Cursor::new(format!("{}\n\n", event_lines().join("\n")).into_bytes());

    let summary = replay_stream(container.pipeline(), input, 8, std::future::pending()).await?;

    assert!(!summary.interrupted);
    assert_eq!(summary.lines, 6);
    assert_eq!(summary.stats.applied, 4);
    assert_eq!(container.storage.count(EntityKind::Liquidation).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_replay_reports_malformed_line() -> Result<()> {
    let container = ServiceContainer::new(IndexerConfig::default()).await?;
    let lines = event_lines();
    let input = Cursor::new(format!("{}\n{{\"meta\": 1}}\n{}\n", lines[1], lines[4]).into_bytes());

    let result = replay_stream(container.pipeline(), input, 8, std::future::pending()).await;

    match result {
        Err(IndexerError::Deserialization(reason)) => assert!(reason.starts_with("line 2:"), "{}", reason),
        other => panic!("expected a deserialization error, got {:?}", other),
    }
    // The borrow before the bad line was still applied; nothing after it was
    assert_eq!(container.storage.count(EntityKind::Borrow).await?, 1);
    assert_eq!(container.storage.count(EntityKind::Repay).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_replay_shutdown_drains_pipeline() -> Result<()> {
    let container = ServiceContainer::new(IndexerConfig::default()).await?;
    let (mut writer, reader) = tokio::io::duplex(64 * 1024);
    writer
        .write_all(format!("{}\n", event_lines().join("\n")).as_bytes())
        .await?;

    // Input stays open; shutdown fires once the last event has landed
    let storage = container.storage.clone();
    let shutdown = async move {
        while storage.count(EntityKind::Liquidation).await.unwrap_or(0) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };

    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        replay_stream(container.pipeline(), BufReader::new(reader), 8, shutdown),
    )
    .await??;

    assert!(summary.interrupted);
    assert_eq!(summary.stats.total(), 6);
    assert_eq!(summary.lines, 6);
    let position = container
        .storage
        .load::<Position>(&identity::position_id(POOL, ALICE))
        .await?
        .unwrap();
    assert_eq!(position.total_underlying_repaid, BigDecimal::from(150));

    drop(writer);
    Ok(())
}
