use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::ExchangeRateDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::exchange_rates;
use crate::utils::format_timestamp;
use tallyfolio_core::fx::{Currency, ExchangeRate, FxRepositoryTrait, NewExchangeRate};
use tallyfolio_core::{Error, Result};

#[derive(Clone)]
pub struct FxRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl FxRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRepository {
    fn get_latest_exchange_rate(
        &self,
        from: Currency,
        to: Currency,
    ) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let row = exchange_rates::table
            .filter(exchange_rates::from_currency.eq(from.as_str()))
            .filter(exchange_rates::to_currency.eq(to.as_str()))
            .order(exchange_rates::timestamp.desc())
            .select(ExchangeRateDB::as_select())
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(ExchangeRate::try_from).transpose()?)
    }

    fn get_exchange_rate_history(
        &self,
        from: Currency,
        to: Currency,
        since: DateTime<Utc>,
    ) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = exchange_rates::table
            .filter(exchange_rates::from_currency.eq(from.as_str()))
            .filter(exchange_rates::to_currency.eq(to.as_str()))
            .filter(exchange_rates::timestamp.ge(format_timestamp(&since)))
            .order(exchange_rates::timestamp.asc())
            .select(ExchangeRateDB::as_select())
            .load::<ExchangeRateDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| ExchangeRate::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn save_exchange_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
        let row = ExchangeRateDB::from_new(Uuid::now_v7().to_string(), rate);
        self.writer
            .exec(move |conn| {
                let stored = diesel::insert_into(exchange_rates::table)
                    .values(&row)
                    .returning(ExchangeRateDB::as_returning())
                    .get_result::<ExchangeRateDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(ExchangeRate::try_from(stored)?)
            })
            .await
    }
}
