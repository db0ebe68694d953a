//! Domain models for lending protocol entities
//!
//! These models represent the entities materialized from pool events.
//! They are independent of storage implementation and contain only
//! domain logic and data.

pub mod account;
pub mod market;
pub mod position;
pub mod protocol;
pub mod records;

// Re-export all models
pub use account::*;
pub use market::*;
pub use position::*;
pub use protocol::*;
pub use records::*;
