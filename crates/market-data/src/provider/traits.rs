//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{FxQuote, ProviderId, Quote};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Callers treat every error as "value unavailable" and fall back to
/// cached or stored data, so implementations should fail fast rather
/// than retry internally.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tallyfolio_market_data::{MarketDataProvider, MarketDataError, Quote, FxQuote};
///
/// struct StaticProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for StaticProvider {
///     fn id(&self) -> &'static str {
///         "STATIC"
///     }
///
///     // ... implement quote methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used as the source tag on
    /// persisted prices and rates.
    fn id(&self) -> ProviderId;

    /// Fetch the latest quote for a ticker symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch the latest spot rate for a currency pair.
    ///
    /// The returned rate is expressed as units of `to` per one unit of `from`.
    async fn get_exchange_rate(&self, from: &str, to: &str) -> Result<FxQuote, MarketDataError>;

    /// Check whether a symbol is listed in the provider's ticker directory.
    ///
    /// Returns `Ok(false)` when the directory answered and does not know the
    /// symbol, and an error when the directory itself could not be reached.
    async fn lookup_symbol(&self, symbol: &str) -> Result<bool, MarketDataError>;
}
