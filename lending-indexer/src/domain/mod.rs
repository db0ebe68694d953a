//! Domain layer - reconciliation logic and domain models
//!
//! This layer contains the rules that turn decoded pool events into
//! entity state, independent of which store backs them.

pub mod finance;
pub mod identity;
pub mod models;
pub mod processors;
pub mod recorder;
pub mod repositories;
pub mod watchlist;

// Re-export commonly used items
pub use models::*;
pub use processors::{EventOutcome, ProcessorRegistry};
pub use watchlist::WatchList;
