//! RocksDB storage backend

mod client;

pub use client::RocksDBStore;
