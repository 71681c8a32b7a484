//! Text encodings for columns stored as TEXT.
//!
//! Timestamps use a fixed-width UTC format so lexical order in SQLite matches
//! chronological order. Decimals are stored as their exact string form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;
use tallyfolio_core::fx::Currency;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(
    column: &'static str,
    value: &str,
) -> std::result::Result<DateTime<Utc>, StorageError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
        .map_err(|e| StorageError::corrupt(column, format!("'{}': {}", value, e)))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(column: &'static str, value: &str) -> std::result::Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::corrupt(column, format!("'{}': {}", value, e)))
}

pub fn parse_decimal(
    column: &'static str,
    value: &str,
) -> std::result::Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| StorageError::corrupt(column, format!("'{}': {}", value, e)))
}

pub fn parse_currency(
    column: &'static str,
    value: &str,
) -> std::result::Result<Currency, StorageError> {
    Currency::from_str(value).map_err(|e| StorageError::corrupt(column, e))
}
