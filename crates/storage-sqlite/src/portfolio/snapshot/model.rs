//! Database model for end-of-day portfolio snapshots.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{
    format_date, format_timestamp, parse_currency, parse_date, parse_decimal, parse_timestamp,
};
use tallyfolio_core::portfolio::snapshot::PortfolioSnapshot;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::portfolio_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshotDB {
    pub id: String,
    pub user_id: String,
    pub snapshot_date: String,
    pub total_value: String,
    pub currency: String,
    pub recorded_at: String,
}

impl TryFrom<PortfolioSnapshotDB> for PortfolioSnapshot {
    type Error = StorageError;

    fn try_from(db: PortfolioSnapshotDB) -> Result<Self, Self::Error> {
        Ok(PortfolioSnapshot {
            snapshot_date: parse_date("portfolio_snapshots.snapshot_date", &db.snapshot_date)?,
            total_value: parse_decimal("portfolio_snapshots.total_value", &db.total_value)?,
            currency: parse_currency("portfolio_snapshots.currency", &db.currency)?,
            recorded_at: parse_timestamp("portfolio_snapshots.recorded_at", &db.recorded_at)?,
            id: db.id,
            user_id: db.user_id,
        })
    }
}

impl From<PortfolioSnapshot> for PortfolioSnapshotDB {
    fn from(snapshot: PortfolioSnapshot) -> Self {
        Self {
            id: snapshot.id,
            user_id: snapshot.user_id,
            snapshot_date: format_date(&snapshot.snapshot_date),
            total_value: snapshot.total_value.to_string(),
            currency: snapshot.currency.as_str().to_string(),
            recorded_at: format_timestamp(&snapshot.recorded_at),
        }
    }
}
