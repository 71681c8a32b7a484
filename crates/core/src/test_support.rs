//! In-memory doubles shared by the service tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tallyfolio_market_data::{FxQuote, MarketDataError, MarketDataProvider, Quote};
use uuid::Uuid;

use crate::errors::{DatabaseError, Error, Result};
use crate::fx::{Currency, ExchangeRate, FxRepositoryTrait, NewExchangeRate};
use crate::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};
use crate::portfolio::valuation::{PortfolioSummary, PortfolioValuation, ValuationServiceTrait};
use crate::quotes::{AssetPrice, NewAssetPrice, PriceStore};
use crate::transactions::{Transaction, TransactionRepositoryTrait, TransactionType};
use crate::users::{User, UserRepositoryTrait};

pub fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn user(id: &str, currency: Currency) -> User {
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        password_hash: String::new(),
        default_currency: currency,
        created_at: ts(2024, 1, 1, 0, 0),
        updated_at: ts(2024, 1, 1, 0, 0),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn transaction(
    id: &str,
    user_id: &str,
    symbol: &str,
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
    currency: Currency,
    transaction_date: NaiveDate,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        user_id: user_id.to_string(),
        symbol: symbol.to_string(),
        transaction_type,
        quantity,
        price,
        currency,
        transaction_date,
        created_at: transaction_date.and_hms_opt(12, 0, 0).unwrap().and_utc(),
    }
}

fn storage_failure() -> Error {
    Error::Database(DatabaseError::QueryFailed("simulated failure".to_string()))
}

// =========================================================================
// Market data provider
// =========================================================================

#[derive(Default)]
pub struct MockProvider {
    quotes: Mutex<HashMap<String, (Decimal, String)>>,
    rates: Mutex<HashMap<(String, String), Decimal>>,
    known_symbols: Mutex<HashSet<String>>,
    directory_down: Mutex<bool>,
    quote_calls: Mutex<Vec<String>>,
    fx_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_quote(&self, symbol: &str, price: Decimal, currency: &str) {
        self.quotes
            .lock()
            .unwrap()
            .insert(symbol.to_string(), (price, currency.to_string()));
    }

    pub fn remove_quote(&self, symbol: &str) {
        self.quotes.lock().unwrap().remove(symbol);
    }

    pub fn set_rate(&self, from: Currency, to: Currency, rate: Decimal) {
        self.rates
            .lock()
            .unwrap()
            .insert((from.to_string(), to.to_string()), rate);
    }

    pub fn clear_rates(&self) {
        self.rates.lock().unwrap().clear();
    }

    pub fn add_known_symbol(&self, symbol: &str) {
        self.known_symbols
            .lock()
            .unwrap()
            .insert(symbol.to_string());
    }

    pub fn set_directory_down(&self, down: bool) {
        *self.directory_down.lock().unwrap() = down;
    }

    pub fn quote_calls(&self) -> Vec<String> {
        self.quote_calls.lock().unwrap().clone()
    }

    pub fn fx_call_count(&self) -> usize {
        self.fx_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn get_latest_quote(&self, symbol: &str) -> std::result::Result<Quote, MarketDataError> {
        self.quote_calls.lock().unwrap().push(symbol.to_string());
        let quote = self.quotes.lock().unwrap().get(symbol).cloned();
        match quote {
            Some((price, currency)) => Ok(Quote::new(symbol, Utc::now(), price, currency, "MOCK")),
            None => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }

    async fn get_exchange_rate(
        &self,
        from: &str,
        to: &str,
    ) -> std::result::Result<FxQuote, MarketDataError> {
        self.fx_calls.fetch_add(1, Ordering::SeqCst);
        let rate = self
            .rates
            .lock()
            .unwrap()
            .get(&(from.to_string(), to.to_string()))
            .copied();
        match rate {
            Some(rate) => Ok(FxQuote {
                from: from.to_string(),
                to: to.to_string(),
                rate,
                timestamp: Utc::now(),
                source: "MOCK".to_string(),
            }),
            None => Err(MarketDataError::ProviderError {
                provider: "MOCK".to_string(),
                message: format!("no rate for {}/{}", from, to),
            }),
        }
    }

    async fn lookup_symbol(&self, symbol: &str) -> std::result::Result<bool, MarketDataError> {
        if *self.directory_down.lock().unwrap() {
            return Err(MarketDataError::Timeout {
                provider: "MOCK".to_string(),
            });
        }
        Ok(self.known_symbols.lock().unwrap().contains(symbol))
    }
}

// =========================================================================
// FX repository
// =========================================================================

#[derive(Default)]
pub struct MockFxRepository {
    rates: Mutex<Vec<ExchangeRate>>,
    fail_writes: Mutex<bool>,
}

impl MockFxRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, from: Currency, to: Currency, rate: Decimal, timestamp: DateTime<Utc>) {
        self.rates.lock().unwrap().push(ExchangeRate {
            id: Uuid::new_v4().to_string(),
            from_currency: from,
            to_currency: to,
            rate,
            source: "SEED".to_string(),
            timestamp,
        });
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn all(&self) -> Vec<ExchangeRate> {
        self.rates.lock().unwrap().clone()
    }
}

#[async_trait]
impl FxRepositoryTrait for MockFxRepository {
    fn get_latest_exchange_rate(
        &self,
        from: Currency,
        to: Currency,
    ) -> Result<Option<ExchangeRate>> {
        Ok(self
            .rates
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.from_currency == from && r.to_currency == to)
            .max_by_key(|r| r.timestamp)
            .cloned())
    }

    fn get_exchange_rate_history(
        &self,
        from: Currency,
        to: Currency,
        since: DateTime<Utc>,
    ) -> Result<Vec<ExchangeRate>> {
        let mut rows: Vec<ExchangeRate> = self
            .rates
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.from_currency == from && r.to_currency == to && r.timestamp >= since)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.timestamp);
        Ok(rows)
    }

    async fn save_exchange_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
        if *self.fail_writes.lock().unwrap() {
            return Err(storage_failure());
        }
        let saved = ExchangeRate {
            id: Uuid::new_v4().to_string(),
            from_currency: rate.from_currency,
            to_currency: rate.to_currency,
            rate: rate.rate,
            source: rate.source,
            timestamp: rate.timestamp,
        };
        self.rates.lock().unwrap().push(saved.clone());
        Ok(saved)
    }
}

// =========================================================================
// Price store
// =========================================================================

#[derive(Default)]
pub struct MockPriceStore {
    prices: Mutex<Vec<AssetPrice>>,
    fail_writes: Mutex<bool>,
}

impl MockPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, symbol: &str, price: Decimal, currency: Currency, timestamp: DateTime<Utc>) {
        self.prices.lock().unwrap().push(AssetPrice {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            price,
            currency,
            source: "SEED".to_string(),
            timestamp,
        });
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn count(&self) -> usize {
        self.prices.lock().unwrap().len()
    }
}

#[async_trait]
impl PriceStore for MockPriceStore {
    fn get_latest_price(&self, symbol: &str) -> Result<Option<AssetPrice>> {
        Ok(self
            .prices
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.symbol == symbol)
            .max_by_key(|p| p.timestamp)
            .cloned())
    }

    async fn save_price(&self, price: NewAssetPrice) -> Result<AssetPrice> {
        if *self.fail_writes.lock().unwrap() {
            return Err(storage_failure());
        }
        let saved = AssetPrice {
            id: Uuid::new_v4().to_string(),
            symbol: price.symbol,
            price: price.price,
            currency: price.currency,
            source: price.source,
            timestamp: price.timestamp,
        };
        self.prices.lock().unwrap().push(saved.clone());
        Ok(saved)
    }
}

// =========================================================================
// Ledger and users
// =========================================================================

#[derive(Default)]
pub struct MockTransactionRepository {
    rows: Mutex<Vec<Transaction>>,
    fail_reads: Mutex<bool>,
}

impl MockTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(rows: Vec<Transaction>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_reads: Mutex::new(false),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }
}

#[async_trait]
impl TransactionRepositoryTrait for MockTransactionRepository {
    fn get_transactions_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(storage_failure());
        }
        let mut rows: Vec<Transaction> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.transaction_date, t.created_at));
        Ok(rows)
    }

    async fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.rows.lock().unwrap().push(transaction.clone());
        Ok(transaction)
    }
}

#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<Vec<User>>,
}

impl MockUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                user.email.clone(),
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update_default_currency(&self, user_id: &str, currency: Currency) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::NotFound(user_id.to_string()))?;
        user.default_currency = currency;
        Ok(user.clone())
    }
}

// =========================================================================
// Snapshots
// =========================================================================

#[derive(Default)]
pub struct MockSnapshotRepository {
    rows: Mutex<Vec<PortfolioSnapshot>>,
}

impl MockSnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, user_id: &str, snapshot_date: NaiveDate, total_value: Decimal, currency: Currency) {
        self.rows.lock().unwrap().push(PortfolioSnapshot {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            snapshot_date,
            total_value,
            currency,
            recorded_at: snapshot_date.and_hms_opt(20, 0, 0).unwrap().and_utc(),
        });
    }

    pub fn all(&self) -> Vec<PortfolioSnapshot> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for MockSnapshotRepository {
    async fn upsert_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows
            .iter_mut()
            .find(|s| s.user_id == snapshot.user_id && s.snapshot_date == snapshot.snapshot_date)
        {
            existing.total_value = snapshot.total_value;
            existing.currency = snapshot.currency;
            existing.recorded_at = snapshot.recorded_at;
            return Ok(existing.clone());
        }
        rows.push(snapshot.clone());
        Ok(snapshot)
    }

    fn get_snapshots_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>> {
        let mut rows: Vec<PortfolioSnapshot> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.snapshot_date >= start && s.snapshot_date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.snapshot_date);
        Ok(rows)
    }
}

// =========================================================================
// Valuation stub
// =========================================================================

/// Returns a fixed total per user; users marked failing get a storage error.
#[derive(Default)]
pub struct StubValuationService {
    totals: Mutex<HashMap<String, Decimal>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl StubValuationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total(&self, user_id: &str, total: Decimal) {
        self.totals
            .lock()
            .unwrap()
            .insert(user_id.to_string(), total);
    }

    pub fn fail_for(&self, user_id: &str) {
        self.failing.lock().unwrap().insert(user_id.to_string());
    }

    pub fn recover(&self, user_id: &str) {
        self.failing.lock().unwrap().remove(user_id);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ValuationServiceTrait for StubValuationService {
    async fn value_transactions(
        &self,
        _transactions: &[Transaction],
        target_currency: Currency,
    ) -> Result<PortfolioValuation> {
        Ok(PortfolioValuation {
            holdings: Vec::new(),
            summary: PortfolioSummary::empty(target_currency),
            warnings: Vec::new(),
            valued_at: Utc::now(),
        })
    }

    async fn get_portfolio_valuation(
        &self,
        user_id: &str,
        target_currency: Currency,
    ) -> Result<PortfolioValuation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(user_id) {
            return Err(storage_failure());
        }
        let mut summary = PortfolioSummary::empty(target_currency);
        summary.total_value = self
            .totals
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        Ok(PortfolioValuation {
            holdings: Vec::new(),
            summary,
            warnings: Vec::new(),
            valued_at: Utc::now(),
        })
    }
}
