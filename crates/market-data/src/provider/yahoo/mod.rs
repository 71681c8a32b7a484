//! Yahoo Finance market data provider.
//!
//! This provider uses the Yahoo Finance API to fetch:
//! - Equities/ETFs (e.g., AAPL, SHOP.TO)
//! - Cryptocurrencies (e.g., BTC-USD)
//! - Foreign exchange rates (e.g., CADUSD=X)

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{FxQuote, ProviderId, Quote};
use crate::provider::MarketDataProvider;

const PROVIDER_ID: ProviderId = "YAHOO";

/// Default per-request timeout applied to every Yahoo call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Exchange suffixes that quote in Canadian dollars.
const CAD_SUFFIXES: &[&str] = &[".TO", ".V", ".NE", ".CN"];

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    timeout: Duration,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self {
            connector,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Yahoo ticker for a currency pair, e.g. `CADUSD=X`.
    pub fn fx_symbol(from: &str, to: &str) -> String {
        format!("{}{}=X", from, to)
    }

    /// Guess the quote currency from the ticker's exchange suffix. Only used
    /// when the response carries no currency.
    ///
    /// Crypto pairs carry their market currency (`BTC-CAD`); everything else
    /// defaults to USD.
    pub fn currency_hint(symbol: &str) -> &'static str {
        let upper = symbol.to_uppercase();
        if CAD_SUFFIXES.iter().any(|suffix| upper.ends_with(suffix)) || upper.ends_with("-CAD")
        {
            "CAD"
        } else {
            "USD"
        }
    }

    async fn with_timeout_of<T, F>(&self, fut: F) -> Result<T, MarketDataError>
    where
        F: Future<Output = Result<T, MarketDataError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }),
        }
    }

    /// Currency reported by Yahoo, falling back to the suffix hint when absent.
    fn quote_currency(reported: Option<&str>, symbol: &str) -> String {
        reported
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Self::currency_hint(symbol).to_string())
    }

    fn map_error(symbol: &str, err: yahoo::YahooError) -> MarketDataError {
        if matches!(err, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
            return MarketDataError::SymbolNotFound(symbol.to_string());
        }
        let message = err.to_string();
        if is_rate_limit_message(&message) {
            warn!("Yahoo rate limited request for {}", symbol);
            MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message,
            }
        }
    }

    /// Fetch the most recent close for a Yahoo ticker, with the currency the
    /// chart metadata reports for it.
    async fn fetch_last_close(
        &self,
        symbol: &str,
    ) -> Result<(DateTime<Utc>, Decimal, Option<String>), MarketDataError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| Self::map_error(symbol, e))?;

        let yahoo_quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        let reported_currency = response.metadata().ok().and_then(|meta| meta.currency);

        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        let close = Decimal::from_f64_retain(yahoo_quote.close)
            .filter(|c| c.is_sign_positive() && !c.is_zero())
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!(
                    "Failed to convert close price {} for {} to Decimal",
                    yahoo_quote.close, symbol
                ),
            })?;

        Ok((timestamp, close, reported_currency))
    }
}

/// Yahoo surfaces HTTP 429 only through the error text.
fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("429") || lower.contains("too many requests")
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> ProviderId {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);
        let (timestamp, close, reported) =
            self.with_timeout_of(self.fetch_last_close(symbol)).await?;
        let currency = Self::quote_currency(reported.as_deref(), symbol);
        Ok(Quote::new(symbol, timestamp, close, currency, PROVIDER_ID))
    }

    async fn get_exchange_rate(&self, from: &str, to: &str) -> Result<FxQuote, MarketDataError> {
        let symbol = Self::fx_symbol(from, to);
        debug!("Fetching exchange rate {} from Yahoo", symbol);
        let (timestamp, rate, _) = self.with_timeout_of(self.fetch_last_close(&symbol)).await?;
        Ok(FxQuote {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            timestamp,
            source: PROVIDER_ID.to_string(),
        })
    }

    async fn lookup_symbol(&self, symbol: &str) -> Result<bool, MarketDataError> {
        let encoded_symbol = encode(symbol).into_owned();
        let result = match self
            .with_timeout_of(async {
                self.connector
                    .search_ticker(&encoded_symbol)
                    .await
                    .map_err(|e| Self::map_error(symbol, e))
            })
            .await
        {
            Ok(result) => result,
            // An empty search is an answer, not an outage.
            Err(MarketDataError::SymbolNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        Ok(result
            .quotes
            .iter()
            .any(|q| q.symbol.eq_ignore_ascii_case(symbol)))
    }
}
