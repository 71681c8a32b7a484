use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::snapshot_model::{
    PointSource, PortfolioSeries, PortfolioSnapshot, SeriesPoint, SeriesRange,
};
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::config::EngineConfig;
use crate::constants::SNAPSHOT_DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::valuation::ValuationServiceTrait;
use crate::users::{User, UserRepositoryTrait};
use crate::utils::time_utils::{get_days_between, local_time_on_date, valuation_date_from_utc};
use crate::utils::Clock;

pub struct SnapshotService {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    valuation_service: Arc<dyn ValuationServiceTrait>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    market_close_hour: u32,
}

impl SnapshotService {
    pub fn new(
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        valuation_service: Arc<dyn ValuationServiceTrait>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            snapshot_repository,
            user_repository,
            valuation_service,
            clock,
            timezone: config.timezone,
            market_close_hour: config.market_close_hour,
        }
    }

    fn load_user(&self, user_id: &str) -> Result<User> {
        self.user_repository
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    fn today(&self) -> NaiveDate {
        valuation_date_from_utc(self.clock.now(), self.timezone)
    }

    async fn live_total(&self, user: &User) -> Result<Decimal> {
        let valuation = self
            .valuation_service
            .get_portfolio_valuation(&user.id, user.default_currency)
            .await?;
        Ok(valuation
            .summary
            .total_value
            .round_dp(SNAPSHOT_DECIMAL_PRECISION))
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn record_snapshot(&self, user_id: &str) -> Result<PortfolioSnapshot> {
        let user = self.load_user(user_id)?;
        let total_value = self.live_total(&user).await?;
        let today = self.today();

        let snapshot = PortfolioSnapshot {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            snapshot_date: today,
            total_value,
            currency: user.default_currency,
            recorded_at: local_time_on_date(today, self.market_close_hour, self.timezone),
        };

        let stored = self.snapshot_repository.upsert_snapshot(snapshot).await?;
        debug!(
            "Recorded snapshot for user {} on {}: {} {}",
            stored.user_id, stored.snapshot_date, stored.total_value, stored.currency
        );
        Ok(stored)
    }

    async fn get_series(&self, user_id: &str, range: SeriesRange) -> Result<PortfolioSeries> {
        let user = self.load_user(user_id)?;
        let today = self.today();
        let days = range.days();
        let start = today - Duration::days(days);
        let yesterday = today - Duration::days(1);

        let stored: HashMap<NaiveDate, PortfolioSnapshot> = self
            .snapshot_repository
            .get_snapshots_in_range(&user.id, start, yesterday)?
            .into_iter()
            .map(|s| (s.snapshot_date, s))
            .collect();
        let total_stored_snapshots = stored.len();

        let live_value = self.live_total(&user).await?;

        let points = get_days_between(start, today)
            .into_iter()
            .map(|date| {
                if date == today {
                    SeriesPoint {
                        date,
                        value: live_value,
                        currency: user.default_currency,
                        source: PointSource::Live,
                    }
                } else if let Some(snapshot) = stored.get(&date) {
                    SeriesPoint {
                        date,
                        value: snapshot.total_value,
                        currency: snapshot.currency,
                        source: PointSource::Stored,
                    }
                } else {
                    SeriesPoint {
                        date,
                        value: Decimal::ZERO,
                        currency: user.default_currency,
                        source: PointSource::Missing,
                    }
                }
            })
            .collect();

        Ok(PortfolioSeries {
            user_id: user.id,
            range,
            currency: user.default_currency,
            points,
            total_stored_snapshots,
            days_in_range: days,
        })
    }

    fn get_snapshots(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>> {
        if start > end {
            return Err(ValidationError::InvalidInput(format!(
                "start {} is after end {}",
                start, end
            ))
            .into());
        }
        self.snapshot_repository
            .get_snapshots_in_range(user_id, start, end)
    }
}
