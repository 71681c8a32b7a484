use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// Source tag for the identity rate (from == to).
pub const IDENTITY_SOURCE: &str = "IDENTITY";

/// An observed conversion rate: one unit of `from_currency` buys `rate`
/// units of `to_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub from_currency: Currency,
    pub to_currency: Currency,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn identity(currency: Currency, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}_{}", currency, currency),
            from_currency: currency,
            to_currency: currency,
            rate: Decimal::ONE,
            source: IDENTITY_SOURCE.to_string(),
            timestamp,
        }
    }

    /// The same observation expressed in the opposite direction.
    /// Returns `None` for a zero rate.
    pub fn inverted(&self) -> Option<Self> {
        if self.rate.is_zero() {
            return None;
        }
        Some(Self {
            id: self.id.clone(),
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            rate: Decimal::ONE / self.rate,
            source: self.source.clone(),
            timestamp: self.timestamp,
        })
    }
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(crate::constants::FX_DECIMAL_PRECISION);
    serializer.serialize_str(&rounded.to_string())
}

/// A rate observation to append to the audit trail.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub rate: Decimal,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}
