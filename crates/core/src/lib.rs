//! Tallyfolio Core - Domain entities, services, and traits.
//!
//! This crate replays a user's transaction ledger into holdings, values them
//! at current prices across CAD and USD, and reconciles end-of-day snapshots
//! into a gap-filled value series. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod config;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod quotes;
pub mod transactions;
pub mod users;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{EngineConfig, NegativeCashPolicy};
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
