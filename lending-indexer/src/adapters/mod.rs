//! Adapters layer - Infrastructure implementations
//!
//! This layer contains the infrastructure adapters that implement
//! the port traits defined in the core layer.

pub mod storage;

// Re-export commonly used adapters
pub use storage::{MemoryStore, RocksDBStore, StorageAdapter};
