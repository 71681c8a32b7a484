//! SQLite storage implementation for the exchange rate audit trail.

mod model;
mod repository;

pub use model::ExchangeRateDB;
pub use repository::FxRepository;

pub use tallyfolio_core::fx::FxRepositoryTrait;
