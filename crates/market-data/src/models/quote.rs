use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market quote for a symbol as reported by a provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Provider symbol the quote was fetched for
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Closing/current price (required)
    pub close: Decimal,

    /// Quote currency (ISO 4217)
    pub currency: String,

    /// Source of the quote (YAHOO, MANUAL, ...)
    pub source: String,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        close: Decimal,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close,
            currency: currency.into(),
            source: source.into(),
        }
    }
}

/// Spot exchange rate observed for a currency pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FxQuote {
    pub from: String,
    pub to: String,
    /// Units of `to` per one unit of `from`
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}
