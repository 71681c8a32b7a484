use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_currency, parse_decimal, parse_timestamp};
use tallyfolio_core::fx::{ExchangeRate, NewExchangeRate};

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateDB {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: String,
    pub source: String,
    pub timestamp: String,
}

impl ExchangeRateDB {
    pub fn from_new(id: String, rate: NewExchangeRate) -> Self {
        Self {
            id,
            from_currency: rate.from_currency.as_str().to_string(),
            to_currency: rate.to_currency.as_str().to_string(),
            rate: rate.rate.to_string(),
            source: rate.source,
            timestamp: format_timestamp(&rate.timestamp),
        }
    }
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = StorageError;

    fn try_from(db: ExchangeRateDB) -> Result<Self, Self::Error> {
        Ok(ExchangeRate {
            from_currency: parse_currency("exchange_rates.from_currency", &db.from_currency)?,
            to_currency: parse_currency("exchange_rates.to_currency", &db.to_currency)?,
            rate: parse_decimal("exchange_rates.rate", &db.rate)?,
            timestamp: parse_timestamp("exchange_rates.timestamp", &db.timestamp)?,
            id: db.id,
            source: db.source,
        })
    }
}
