//! SQLite storage implementation for persisted asset prices.

mod model;
mod repository;

pub use model::AssetPriceDB;
pub use repository::PriceRepository;

pub use tallyfolio_core::quotes::PriceStore;
