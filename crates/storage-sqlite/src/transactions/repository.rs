use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::TransactionDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transactions;
use tallyfolio_core::errors::{Error, Result};
use tallyfolio_core::transactions::{Transaction, TransactionRepositoryTrait};

pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_transactions_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        // rowid breaks ties between rows dated the same day in append order.
        let rows = sql_query(
            "SELECT id, user_id, symbol, transaction_type, quantity, price, currency, \
                    transaction_date, created_at \
             FROM transactions \
             WHERE user_id = ? \
             ORDER BY transaction_date ASC, rowid ASC",
        )
        .bind::<Text, _>(user_id)
        .load::<TransactionDB>(&mut conn)
        .map_err(StorageError::from)?;

        debug!("Loaded {} ledger rows for user {}", rows.len(), user_id);
        rows.into_iter()
            .map(|row| Transaction::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        let row = TransactionDB::from(transaction);
        self.writer
            .exec(move |conn| {
                let stored = diesel::insert_into(transactions::table)
                    .values(&row)
                    .returning(TransactionDB::as_returning())
                    .get_result::<TransactionDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Transaction::try_from(stored)?)
            })
            .await
    }
}
