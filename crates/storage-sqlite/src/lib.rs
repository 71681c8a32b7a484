//! SQLite storage implementation for Tallyfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `tallyfolio-core`:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, the ledger, prices, FX rates and
//!   snapshots
//! - Database-specific model types (with Diesel derives)
//!
//! Reads go through the r2d2 pool. Writes are funneled through a single
//! writer actor ([`WriteHandle`]) so SQLite never sees concurrent writers.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod fx;
pub mod portfolio;
pub mod quotes;
pub mod transactions;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::StorageError;

pub use fx::FxRepository;
pub use portfolio::snapshot::SnapshotRepository;
pub use quotes::PriceRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

// Re-export from tallyfolio-core for convenience
pub use tallyfolio_core::errors::{DatabaseError, Error, Result};
