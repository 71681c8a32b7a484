//! Storage contract for persisted prices.

use async_trait::async_trait;

use super::model::{AssetPrice, NewAssetPrice};
use crate::errors::Result;

#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Newest row for a symbol, any age.
    fn get_latest_price(&self, symbol: &str) -> Result<Option<AssetPrice>>;

    /// Appends a row. Never updates an existing one.
    async fn save_price(&self, price: NewAssetPrice) -> Result<AssetPrice>;
}
