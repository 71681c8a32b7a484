use async_trait::async_trait;
use chrono::NaiveDate;

use super::snapshot_model::{PortfolioSeries, PortfolioSnapshot, SeriesRange};
use crate::errors::Result;

/// Persistence contract for end-of-day snapshots.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Inserts, or overwrites the value of the row with the same
    /// `(user_id, snapshot_date)`. Returns the stored row.
    async fn upsert_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot>;

    /// Rows with `start <= snapshot_date <= end`, oldest first.
    fn get_snapshots_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>>;
}

#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Values the user's portfolio now and stores it as today's snapshot.
    async fn record_snapshot(&self, user_id: &str) -> Result<PortfolioSnapshot>;

    /// Gap-filled daily series ending with a live value for today.
    async fn get_series(&self, user_id: &str, range: SeriesRange) -> Result<PortfolioSeries>;

    fn get_snapshots(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>>;
}
