#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{create_pool, run_migrations, spawn_writer, DbPool, WriteHandle};
use tallyfolio_core::fx::Currency;
use tallyfolio_core::transactions::{Transaction, TransactionType};
use tallyfolio_core::users::User;

/// A migrated database in a temp dir. Keep it alive for the whole test.
pub struct TestDatabase {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

/// Must be called from inside a Tokio runtime; the writer is spawned on it.
pub fn create_test_database() -> TestDatabase {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    TestDatabase {
        pool,
        writer,
        _dir: dir,
    }
}

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(id: &str, currency: Currency) -> User {
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        password_hash: String::new(),
        default_currency: currency,
        created_at: ts(2024, 6, 3, 12, 0),
        updated_at: ts(2024, 6, 3, 12, 0),
    }
}

pub fn transaction(
    id: &str,
    user_id: &str,
    symbol: &str,
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
    transaction_date: NaiveDate,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        user_id: user_id.to_string(),
        symbol: symbol.to_string(),
        transaction_type,
        quantity,
        price,
        currency: Currency::Usd,
        transaction_date,
        created_at: ts(2024, 6, 3, 12, 0),
    }
}
