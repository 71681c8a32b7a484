//! Process-wide in-memory price cache.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use super::model::AssetPrice;

#[derive(Debug, Clone)]
struct CacheEntry {
    price: AssetPrice,
    cached_at: DateTime<Utc>,
}

/// Symbol-keyed price cache shared by every request.
///
/// Entries older than the TTL are ignored on read but never purged. Writes are
/// last-write-wins, so concurrent fetches of the same symbol are harmless.
#[derive(Debug)]
pub struct PriceCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, symbol: &str, now: DateTime<Utc>) -> Option<AssetPrice> {
        let entry = self.entries.get(symbol)?;
        if now - entry.cached_at <= self.ttl {
            Some(entry.price.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, price: AssetPrice, now: DateTime<Utc>) {
        self.entries.insert(
            price.symbol.clone(),
            CacheEntry {
                price,
                cached_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
