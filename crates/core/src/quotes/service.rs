//! Price source adapter.
//!
//! Layers, checked in order for each symbol:
//!
//! 1. [`PriceCache`] entry younger than the memory TTL
//! 2. newest persisted row younger than the stored TTL
//! 3. live provider fetch, which refreshes the cache and appends a row
//!
//! A failed fetch yields `None`; callers treat that as "price unknown".

use async_trait::async_trait;
use chrono::Duration;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tallyfolio_market_data::MarketDataProvider;

use super::cache::PriceCache;
use super::model::{AssetPrice, NewAssetPrice, PriceBatch, PriceOrigin};
use super::store::PriceStore;
use crate::config::EngineConfig;
use crate::constants::{CASH_SYMBOL, PRICE_DECIMAL_PRECISION};
use crate::errors::Result;
use crate::fx::Currency;
use crate::utils::Clock;

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Best available price for one symbol, or `None` when unknown.
    async fn current_price(&self, symbol: &str) -> Option<AssetPrice>;

    /// Prices for many symbols, fetched in rate-limited chunks.
    async fn current_prices(&self, symbols: &[String]) -> PriceBatch;

    /// Newest persisted price of any age, without touching the provider.
    fn latest_stored_price(&self, symbol: &str) -> Result<Option<AssetPrice>>;
}

pub struct QuoteService {
    store: Arc<dyn PriceStore>,
    provider: Arc<dyn MarketDataProvider>,
    cache: Arc<PriceCache>,
    clock: Arc<dyn Clock>,
    stored_ttl: Duration,
    batch_size: usize,
    batch_pause: StdDuration,
}

impl QuoteService {
    pub fn new(
        store: Arc<dyn PriceStore>,
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<PriceCache>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            provider,
            cache,
            clock,
            stored_ttl: config.stored_price_ttl,
            batch_size: config.price_batch_size.max(1),
            batch_pause: config.price_batch_pause,
        }
    }

    fn normalize_symbol(symbol: &str) -> String {
        symbol.trim().to_uppercase()
    }

    async fn resolve(&self, symbol: &str) -> (Option<AssetPrice>, PriceOrigin) {
        let now = self.clock.now();

        if let Some(price) = self.cache.get(symbol, now) {
            return (Some(price), PriceOrigin::Memory);
        }

        match self.store.get_latest_price(symbol) {
            Ok(Some(stored)) if now - stored.timestamp <= self.stored_ttl => {
                // Aged from the row's own timestamp, so the memory layer never
                // outlives the stored-price bound.
                self.cache.insert(stored.clone(), stored.timestamp.min(now));
                return (Some(stored), PriceOrigin::Stored);
            }
            Ok(_) => {}
            Err(e) => warn!("Stored price lookup for {} failed: {}", symbol, e),
        }

        match self.fetch_live(symbol).await {
            Some(price) => (Some(price), PriceOrigin::Live),
            None => (None, PriceOrigin::Unavailable),
        }
    }

    async fn fetch_live(&self, symbol: &str) -> Option<AssetPrice> {
        let quote = match self.provider.get_latest_quote(symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Live price for {} unavailable: {}", symbol, e);
                return None;
            }
        };

        if quote.close <= Decimal::ZERO {
            warn!("Discarding non-positive price {} for {}", quote.close, symbol);
            return None;
        }
        let currency = match Currency::from_str(&quote.currency) {
            Ok(currency) => currency,
            Err(e) => {
                warn!("Discarding price for {}: {}", symbol, e);
                return None;
            }
        };

        let now = self.clock.now();
        let new_price = NewAssetPrice {
            symbol: symbol.to_string(),
            price: quote.close.round_dp(PRICE_DECIMAL_PRECISION),
            currency,
            source: quote.source,
            timestamp: now,
        };

        let price = match self.store.save_price(new_price.clone()).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Failed to persist price for {}: {}", symbol, e);
                AssetPrice {
                    id: format!("{}_unsaved", symbol),
                    symbol: new_price.symbol,
                    price: new_price.price,
                    currency: new_price.currency,
                    source: new_price.source,
                    timestamp: new_price.timestamp,
                }
            }
        };

        self.cache.insert(price.clone(), now);
        Some(price)
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn current_price(&self, symbol: &str) -> Option<AssetPrice> {
        let symbol = Self::normalize_symbol(symbol);
        if symbol.is_empty() || symbol == CASH_SYMBOL {
            return None;
        }
        self.resolve(&symbol).await.0
    }

    async fn current_prices(&self, symbols: &[String]) -> PriceBatch {
        let mut seen = HashSet::new();
        let unique: Vec<String> = symbols
            .iter()
            .map(|s| Self::normalize_symbol(s))
            .filter(|s| !s.is_empty() && s != CASH_SYMBOL)
            .filter(|s| seen.insert(s.clone()))
            .collect();

        let mut prices = HashMap::with_capacity(unique.len());
        let mut missing = Vec::new();
        let mut previous_chunk_hit_provider = false;

        for chunk in unique.chunks(self.batch_size) {
            // Only pause when the last chunk actually reached the provider.
            if previous_chunk_hit_provider && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }

            let results = join_all(chunk.iter().map(|symbol| self.resolve(symbol))).await;

            previous_chunk_hit_provider = false;
            for (symbol, (price, origin)) in chunk.iter().zip(results) {
                previous_chunk_hit_provider |= origin.hit_provider();
                match price {
                    Some(price) => {
                        prices.insert(symbol.clone(), price);
                    }
                    None => missing.push(symbol.clone()),
                }
            }
        }

        debug!(
            "Resolved {} of {} prices ({} missing)",
            prices.len(),
            unique.len(),
            missing.len()
        );

        PriceBatch { prices, missing }
    }

    fn latest_stored_price(&self, symbol: &str) -> Result<Option<AssetPrice>> {
        self.store.get_latest_price(&Self::normalize_symbol(symbol))
    }
}
