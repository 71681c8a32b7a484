use super::currency::Currency;
use super::fx_model::{ExchangeRate, NewExchangeRate};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Persistence contract for the append-only exchange rate audit trail.
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    /// Newest stored row for exactly this direction, any age.
    fn get_latest_exchange_rate(&self, from: Currency, to: Currency)
        -> Result<Option<ExchangeRate>>;

    /// Stored rows for exactly this direction observed at or after `since`,
    /// oldest first.
    fn get_exchange_rate_history(
        &self,
        from: Currency,
        to: Currency,
        since: DateTime<Utc>,
    ) -> Result<Vec<ExchangeRate>>;

    /// Append a new observation. Never updates an existing row.
    async fn save_exchange_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate>;
}

/// Trait defining the contract for currency conversion.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Resolve the rate for a pair, including where it came from.
    async fn resolve_rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate>;

    async fn get_rate(&self, from: Currency, to: Currency) -> Result<Decimal>;

    async fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Result<Decimal>;

    /// Boundary variant taking raw currency codes; unknown codes fail with
    /// `UnsupportedCurrency`.
    async fn get_rate_for_codes(&self, from: &str, to: &str) -> Result<Decimal>;

    /// One resolved rate for every ordered pair of supported currencies.
    async fn get_latest_rates(&self) -> Result<Vec<ExchangeRate>>;

    /// Stored observations for a pair over the last `days` days.
    fn get_rate_history(
        &self,
        from: Currency,
        to: Currency,
        days: i64,
    ) -> Result<Vec<ExchangeRate>>;
}
