use super::currency::{currency_pairs, Currency};
use super::fx_errors::FxError;
use super::fx_model::{ExchangeRate, NewExchangeRate};
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait};
use crate::errors::Result;
use crate::utils::Clock;
use async_trait::async_trait;
use chrono::Duration;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tallyfolio_market_data::MarketDataProvider;

/// Resolves conversion rates through four tiers, in order: a stored rate
/// younger than the TTL, a live provider fetch (persisted on success), the
/// newest stored rate of any age, and finally `RateUnavailable`.
///
/// Stored lookups consider both directions of a pair; an inverse row is
/// inverted before use and the newer of the two wins.
#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    rate_ttl: Duration,
}

impl FxService {
    pub fn new(
        repository: Arc<dyn FxRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            provider,
            clock,
            rate_ttl: Duration::hours(1),
        }
    }

    pub fn with_rate_ttl(mut self, ttl: Duration) -> Self {
        self.rate_ttl = ttl;
        self
    }

    fn load_latest_stored(&self, from: Currency, to: Currency) -> Result<Option<ExchangeRate>> {
        let direct = self.repository.get_latest_exchange_rate(from, to)?;
        let inverse = self
            .repository
            .get_latest_exchange_rate(to, from)?
            .and_then(|rate| rate.inverted());

        Ok(match (direct, inverse) {
            (Some(direct), Some(inverse)) => {
                if inverse.timestamp > direct.timestamp {
                    Some(inverse)
                } else {
                    Some(direct)
                }
            }
            (direct, inverse) => direct.or(inverse),
        })
    }

    async fn fetch_and_store(&self, from: Currency, to: Currency) -> Result<ExchangeRate> {
        let quote = self
            .provider
            .get_exchange_rate(from.as_str(), to.as_str())
            .await
            .map_err(|e| FxError::FetchError(e.to_string()))?;

        if quote.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{}/{} returned non-positive rate {}",
                from, to, quote.rate
            ))
            .into());
        }

        // The observation time is when we saw the rate, not the provider's
        // market timestamp, so freshness checks stay meaningful over weekends.
        let new_rate = NewExchangeRate {
            from_currency: from,
            to_currency: to,
            rate: quote.rate,
            source: quote.source.to_string(),
            timestamp: self.clock.now(),
        };

        match self.repository.save_exchange_rate(new_rate.clone()).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                log::warn!("Failed to persist {}/{} rate: {}", from, to, e);
                Ok(ExchangeRate {
                    id: format!("{}{}_unsaved", from, to),
                    from_currency: new_rate.from_currency,
                    to_currency: new_rate.to_currency,
                    rate: new_rate.rate,
                    source: new_rate.source,
                    timestamp: new_rate.timestamp,
                })
            }
        }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn resolve_rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate> {
        let now = self.clock.now();
        if from == to {
            return Ok(ExchangeRate::identity(from, now));
        }

        let stored = match self.load_latest_stored(from, to) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Stored rate lookup for {}/{} failed: {}", from, to, e);
                None
            }
        };

        if let Some(rate) = &stored {
            if now - rate.timestamp <= self.rate_ttl {
                log::debug!("Using fresh stored rate for {}/{}", from, to);
                return Ok(rate.clone());
            }
        }

        match self.fetch_and_store(from, to).await {
            Ok(rate) => Ok(rate),
            Err(e) => {
                log::warn!("Live rate for {}/{} unavailable: {}", from, to, e);
                stored.ok_or_else(|| {
                    FxError::RateUnavailable {
                        from: from.to_string(),
                        to: to.to_string(),
                    }
                    .into()
                })
            }
        }
    }

    async fn get_rate(&self, from: Currency, to: Currency) -> Result<Decimal> {
        Ok(self.resolve_rate(from, to).await?.rate)
    }

    async fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Result<Decimal> {
        if from == to {
            return Ok(amount);
        }
        let rate = self.get_rate(from, to).await?;
        Ok(amount * rate)
    }

    async fn get_rate_for_codes(&self, from: &str, to: &str) -> Result<Decimal> {
        let from = Currency::from_str(from)?;
        let to = Currency::from_str(to)?;
        self.get_rate(from, to).await
    }

    async fn get_latest_rates(&self) -> Result<Vec<ExchangeRate>> {
        let mut rates = Vec::new();
        for (from, to) in currency_pairs() {
            match self.resolve_rate(from, to).await {
                Ok(rate) => rates.push(rate),
                Err(e) => log::warn!("Skipping {}/{}: {}", from, to, e),
            }
        }
        Ok(rates)
    }

    fn get_rate_history(
        &self,
        from: Currency,
        to: Currency,
        days: i64,
    ) -> Result<Vec<ExchangeRate>> {
        if days <= 0 {
            return Err(crate::errors::ValidationError::InvalidInput(format!(
                "days must be positive, got {}",
                days
            ))
            .into());
        }
        let since = self.clock.now() - Duration::days(days);
        self.repository.get_exchange_rate_history(from, to, since)
    }
}
