use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::fx::Currency;

/// A persisted price observation. Rows are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPrice {
    pub id: String,
    pub symbol: String,
    pub price: Decimal,
    pub currency: Currency,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetPrice {
    pub symbol: String,
    pub price: Decimal,
    pub currency: Currency,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a batch lookup: resolved prices plus the symbols with no price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBatch {
    pub prices: HashMap<String, AssetPrice>,
    pub missing: Vec<String>,
}

impl PriceBatch {
    pub fn get(&self, symbol: &str) -> Option<&AssetPrice> {
        self.prices.get(symbol)
    }
}

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrigin {
    Memory,
    Stored,
    Live,
    /// The provider was asked and had nothing.
    Unavailable,
}

impl PriceOrigin {
    pub(crate) fn hit_provider(&self) -> bool {
        matches!(self, PriceOrigin::Live | PriceOrigin::Unavailable)
    }
}
