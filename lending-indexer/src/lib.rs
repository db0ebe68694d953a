//! Lending Protocol Indexer Library
//!
//! Incrementally materializes accounts, markets, positions and immutable
//! event records from decoded lending pool events, tolerating duplicate and
//! out-of-order delivery.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types
pub use config::IndexerConfig;
pub use crate::core::{IndexerError, IndexerResult, LendingEvent};
pub use domain::{EventOutcome, ProcessorRegistry};
pub use infrastructure::ServiceContainer;
