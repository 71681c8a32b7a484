use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::fx::Currency;

/// Persisted end-of-day portfolio total. At most one per `(user_id, snapshot_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub user_id: String,
    pub snapshot_date: NaiveDate,
    pub total_value: Decimal,
    pub currency: Currency,
    /// Canonical market-close instant of `snapshot_date`, not the write time.
    pub recorded_at: DateTime<Utc>,
}

/// Window for the value series. Parsed from `7d|30d|90d|180d|365d`, with
/// `3m|6m|12m` accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeriesRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d", alias = "3m")]
    Quarter,
    #[serde(rename = "180d", alias = "6m")]
    HalfYear,
    #[serde(rename = "365d", alias = "12m")]
    Year,
}

impl SeriesRange {
    pub const ALL: [SeriesRange; 5] = [
        SeriesRange::Week,
        SeriesRange::Month,
        SeriesRange::Quarter,
        SeriesRange::HalfYear,
        SeriesRange::Year,
    ];

    pub fn days(&self) -> i64 {
        match self {
            SeriesRange::Week => 7,
            SeriesRange::Month => 30,
            SeriesRange::Quarter => 90,
            SeriesRange::HalfYear => 180,
            SeriesRange::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesRange::Week => "7d",
            SeriesRange::Month => "30d",
            SeriesRange::Quarter => "90d",
            SeriesRange::HalfYear => "180d",
            SeriesRange::Year => "365d",
        }
    }
}

impl fmt::Display for SeriesRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(SeriesRange::Week),
            "30d" => Ok(SeriesRange::Month),
            "90d" | "3m" => Ok(SeriesRange::Quarter),
            "180d" | "6m" => Ok(SeriesRange::HalfYear),
            "365d" | "12m" => Ok(SeriesRange::Year),
            other => Err(ValidationError::InvalidInput(format!(
                "Unsupported range '{}'; expected one of 7d, 30d, 90d, 180d, 365d",
                other
            ))),
        }
    }
}

/// How a series value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointSource {
    Stored,
    /// No snapshot exists for the day; the value is zero.
    Missing,
    /// Today, computed on demand and already in the display currency.
    Live,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Decimal,
    pub currency: Currency,
    pub source: PointSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSeries {
    pub user_id: String,
    pub range: SeriesRange,
    pub currency: Currency,
    /// One point per calendar day, oldest first; always `days_in_range + 1` long.
    pub points: Vec<SeriesPoint>,
    pub total_stored_snapshots: usize,
    pub days_in_range: i64,
}
