use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::PortfolioSnapshotDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::portfolio_snapshots;
use crate::utils::format_date;
use tallyfolio_core::errors::{Error, Result};
use tallyfolio_core::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};

pub struct SnapshotRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn upsert_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let row = PortfolioSnapshotDB::from(snapshot);
        debug!(
            "Upserting snapshot for user {} on {}",
            row.user_id, row.snapshot_date
        );
        self.writer
            .exec(move |conn| {
                // The existing id is kept so the row's identity is stable.
                let stored = diesel::insert_into(portfolio_snapshots::table)
                    .values(&row)
                    .on_conflict((
                        portfolio_snapshots::user_id,
                        portfolio_snapshots::snapshot_date,
                    ))
                    .do_update()
                    .set((
                        portfolio_snapshots::total_value
                            .eq(excluded(portfolio_snapshots::total_value)),
                        portfolio_snapshots::currency.eq(excluded(portfolio_snapshots::currency)),
                        portfolio_snapshots::recorded_at
                            .eq(excluded(portfolio_snapshots::recorded_at)),
                    ))
                    .returning(PortfolioSnapshotDB::as_returning())
                    .get_result::<PortfolioSnapshotDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(PortfolioSnapshot::try_from(stored)?)
            })
            .await
    }

    fn get_snapshots_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolio_snapshots::table
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .filter(portfolio_snapshots::snapshot_date.ge(format_date(&start)))
            .filter(portfolio_snapshots::snapshot_date.le(format_date(&end)))
            .order(portfolio_snapshots::snapshot_date.asc())
            .select(PortfolioSnapshotDB::as_select())
            .load::<PortfolioSnapshotDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| PortfolioSnapshot::try_from(row).map_err(Error::from))
            .collect()
    }
}
