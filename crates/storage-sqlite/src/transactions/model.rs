//! Database model for ledger rows.

use diesel::prelude::*;
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::StorageError;
use crate::utils::{
    format_date, format_timestamp, parse_currency, parse_date, parse_decimal, parse_timestamp,
};
use tallyfolio_core::transactions::{Transaction, TransactionType};

#[derive(
    Debug, Clone, Queryable, QueryableByName, Selectable, Insertable, Serialize, Deserialize,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TransactionDB {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub user_id: String,
    #[diesel(sql_type = Text)]
    pub symbol: String,
    #[diesel(sql_type = Text)]
    pub transaction_type: String,
    #[diesel(sql_type = Text)]
    pub quantity: String,
    #[diesel(sql_type = Text)]
    pub price: String,
    #[diesel(sql_type = Text)]
    pub currency: String,
    #[diesel(sql_type = Text)]
    pub transaction_date: String,
    #[diesel(sql_type = Text)]
    pub created_at: String,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Transaction {
            transaction_type: TransactionType::from_str(&db.transaction_type)
                .map_err(|e| StorageError::corrupt("transactions.transaction_type", e))?,
            quantity: parse_decimal("transactions.quantity", &db.quantity)?,
            price: parse_decimal("transactions.price", &db.price)?,
            currency: parse_currency("transactions.currency", &db.currency)?,
            transaction_date: parse_date("transactions.transaction_date", &db.transaction_date)?,
            created_at: parse_timestamp("transactions.created_at", &db.created_at)?,
            id: db.id,
            user_id: db.user_id,
            symbol: db.symbol,
        })
    }
}

impl From<Transaction> for TransactionDB {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            symbol: tx.symbol,
            transaction_type: tx.transaction_type.as_str().to_string(),
            quantity: tx.quantity.to_string(),
            price: tx.price.to_string(),
            currency: tx.currency.as_str().to_string(),
            transaction_date: format_date(&tx.transaction_date),
            created_at: format_timestamp(&tx.created_at),
        }
    }
}
