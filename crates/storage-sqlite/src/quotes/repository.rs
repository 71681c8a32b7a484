use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::AssetPriceDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::asset_prices;
use tallyfolio_core::errors::Result;
use tallyfolio_core::quotes::{AssetPrice, NewAssetPrice, PriceStore};

pub struct PriceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceStore for PriceRepository {
    fn get_latest_price(&self, symbol: &str) -> Result<Option<AssetPrice>> {
        let mut conn = get_connection(&self.pool)?;
        let row = asset_prices::table
            .filter(asset_prices::symbol.eq(symbol))
            .order(asset_prices::timestamp.desc())
            .select(AssetPriceDB::as_select())
            .first::<AssetPriceDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(AssetPrice::try_from).transpose()?)
    }

    async fn save_price(&self, price: NewAssetPrice) -> Result<AssetPrice> {
        let row = AssetPriceDB::from_new(Uuid::now_v7().to_string(), price);
        self.writer
            .exec(move |conn| {
                let stored = diesel::insert_into(asset_prices::table)
                    .values(&row)
                    .returning(AssetPriceDB::as_returning())
                    .get_result::<AssetPriceDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(AssetPrice::try_from(stored)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_database, ts};
    use rust_decimal_macros::dec;
    use tallyfolio_core::fx::Currency;

    fn new_price(symbol: &str, price: rust_decimal::Decimal, hour: u32) -> NewAssetPrice {
        NewAssetPrice {
            symbol: symbol.to_string(),
            price,
            currency: Currency::Usd,
            source: "YAHOO".to_string(),
            timestamp: ts(2024, 6, 3, hour, 0),
        }
    }

    #[tokio::test]
    async fn test_latest_price_is_newest_row() {
        let db = create_test_database();
        let repo = PriceRepository::new(db.pool.clone(), db.writer.clone());

        repo.save_price(new_price("AAPL", dec!(190.1), 15)).await.unwrap();
        repo.save_price(new_price("AAPL", dec!(191.2), 16)).await.unwrap();
        repo.save_price(new_price("MSFT", dec!(420), 17)).await.unwrap();

        let latest = repo.get_latest_price("AAPL").unwrap().unwrap();
        assert_eq!(latest.price, dec!(191.2));
        assert_eq!(latest.timestamp, ts(2024, 6, 3, 16, 0));
        assert!(repo.get_latest_price("TSLA").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rows_are_appended_not_replaced() {
        let db = create_test_database();
        let repo = PriceRepository::new(db.pool.clone(), db.writer.clone());
        let first = repo.save_price(new_price("AAPL", dec!(1), 15)).await.unwrap();
        let second = repo.save_price(new_price("AAPL", dec!(1), 15)).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
