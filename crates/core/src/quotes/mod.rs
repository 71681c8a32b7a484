//! Price lookups for valuation.
//!
//! - [`model`] - persisted price rows and batch results
//! - [`store`] - storage trait implemented by the SQLite crate
//! - [`cache`] - process-wide in-memory cache
//! - [`service`] - the layered lookup used by valuation

pub mod cache;
pub mod model;
pub mod service;
pub mod store;


pub use cache::PriceCache;
pub use model::{AssetPrice, NewAssetPrice, PriceBatch, PriceOrigin};
pub use service::{QuoteService, QuoteServiceTrait};
pub use store::PriceStore;
