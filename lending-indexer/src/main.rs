//! Lending Protocol Indexer
//!
//! Replays newline-delimited JSON pool events into the configured store.

use anyhow::{Context, Result};
use clap::Parser;
use lending_indexer::config::IndexerConfig;
use lending_indexer::core::EntityKind;
use lending_indexer::services::replay_stream;
use lending_indexer::ServiceContainer;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lending-indexer")]
#[command(about = "Lending Protocol Event Indexer")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "indexer.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Decoded events, one JSON object per line ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    events: String,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        IndexerConfig::from_file(&cli.config)?
    } else {
        IndexerConfig::default()
    };

    // Override log level if provided
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config);
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting Lending Protocol Indexer");
    info!("Network: {}", config.protocol.network);
    info!("Storage backend: {:?}", config.storage.backend);

    config.validate_settings()?;
    config.ensure_directories()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let capacity = config.indexer.channel_capacity;
    let container = ServiceContainer::new(config).await?;
    container.health_check().await?;

    let input: Box<dyn AsyncBufRead + Unpin + Send> = if cli.events == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(&cli.events)
            .await
            .with_context(|| format!("Failed to open event file {}", cli.events))?;
        Box::new(BufReader::new(file))
    };

    info!("Indexer started. Press Ctrl+C to shutdown.");
    let outcome = replay_stream(container.pipeline(), input, capacity, shutdown_signal()).await;

    // Exact counts would scan every RocksDB column family
    for kind in EntityKind::ALL {
        let count = container.storage.approximate_count(kind).await?;
        info!("{}: ~{}", kind, count);
    }

    let summary = outcome.context("Replay failed")?;
    info!(
        "Processed {} events ({} applied, {} ignored, {} registrations){}",
        summary.lines,
        summary.stats.applied,
        summary.stats.ignored,
        summary.stats.registrations,
        if summary.interrupted { ", interrupted" } else { "" }
    );

    info!("Shutting down Lending Protocol Indexer");
    if summary.interrupted && cli.events == "-" {
        // A pending stdin read holds a blocking thread that runtime shutdown waits on
        std::process::exit(0);
    }
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

fn init_logging(config: &IndexerConfig) {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lending_indexer={}", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
