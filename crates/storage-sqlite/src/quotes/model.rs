use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_currency, parse_decimal, parse_timestamp};
use tallyfolio_core::quotes::{AssetPrice, NewAssetPrice};

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::asset_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AssetPriceDB {
    pub id: String,
    pub symbol: String,
    pub price: String,
    pub currency: String,
    pub source: String,
    pub timestamp: String,
}

impl AssetPriceDB {
    pub fn from_new(id: String, price: NewAssetPrice) -> Self {
        Self {
            id,
            symbol: price.symbol,
            price: price.price.to_string(),
            currency: price.currency.as_str().to_string(),
            source: price.source,
            timestamp: format_timestamp(&price.timestamp),
        }
    }
}

impl TryFrom<AssetPriceDB> for AssetPrice {
    type Error = StorageError;

    fn try_from(db: AssetPriceDB) -> Result<Self, Self::Error> {
        Ok(AssetPrice {
            price: parse_decimal("asset_prices.price", &db.price)?,
            currency: parse_currency("asset_prices.currency", &db.currency)?,
            timestamp: parse_timestamp("asset_prices.timestamp", &db.timestamp)?,
            id: db.id,
            symbol: db.symbol,
            source: db.source,
        })
    }
}
