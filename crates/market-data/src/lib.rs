//! Tallyfolio Market Data Crate
//!
//! Provider-agnostic access to the two external capabilities the valuation
//! engine consumes:
//! - "fetch the current price for a symbol"
//! - "fetch the exchange rate between two currencies"
//!
//! plus a ticker-directory lookup used to validate ledger symbols.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +----------------------+
//! |   core services  | --> |  MarketDataProvider  |  (trait)
//! +------------------+     +----------------------+
//!                                    |
//!                                    v
//!                          +------------------+
//!                          |  YahooProvider   |
//!                          +------------------+
//! ```
//!
//! Every call may fail; callers are expected to degrade to cached or stored
//! values rather than propagate the failure.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{FxQuote, ProviderId, Quote};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
