//! End-of-day snapshot gate.
//!
//! [`SnapshotScheduler::is_due`] is a pure function of the clock: weekdays
//! from the market-close hour onward, local time. The hosting process decides
//! how often to call [`SnapshotScheduler::run_if_due`]; once a user has been
//! recorded for a local date the gated path leaves them alone until the next
//! business day, so the stored value stays the one taken at close. Users that
//! failed are retried on the next gated call.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::snapshot_traits::SnapshotServiceTrait;
use crate::config::EngineConfig;
use crate::errors::Result;
use crate::users::{User, UserRepositoryTrait};
use crate::utils::time_utils::{is_business_day, local_hour, valuation_date_from_utc};
use crate::utils::Clock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshotFailure {
    pub user_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRunReport {
    pub run_at: DateTime<Utc>,
    pub snapshot_date: NaiveDate,
    pub recorded: Vec<String>,
    pub failed: Vec<UserSnapshotFailure>,
}

pub struct SnapshotScheduler {
    user_repository: Arc<dyn UserRepositoryTrait>,
    snapshot_service: Arc<dyn SnapshotServiceTrait>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    market_close_hour: u32,
    /// Users recorded so far for one local date.
    recorded_today: Mutex<(Option<NaiveDate>, HashSet<String>)>,
}

impl SnapshotScheduler {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        snapshot_service: Arc<dyn SnapshotServiceTrait>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            user_repository,
            snapshot_service,
            clock,
            timezone: config.timezone,
            market_close_hour: config.market_close_hour,
            recorded_today: Mutex::new((None, HashSet::new())),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let local_date = valuation_date_from_utc(now, self.timezone);
        is_business_day(local_date) && local_hour(now, self.timezone) >= self.market_close_hour
    }

    /// Runs only when the gate is open and someone is still unrecorded for
    /// today's local date; `Ok(None)` otherwise.
    pub async fn run_if_due(&self) -> Result<Option<SnapshotRunReport>> {
        let run_at = self.clock.now();
        if !self.is_due(run_at) {
            return Ok(None);
        }
        let snapshot_date = valuation_date_from_utc(run_at, self.timezone);

        let mut recorded_today = self.recorded_today.lock().await;
        if recorded_today.0 != Some(snapshot_date) {
            *recorded_today = (Some(snapshot_date), HashSet::new());
        }

        let pending: Vec<User> = self
            .user_repository
            .list_users()?
            .into_iter()
            .filter(|user| !recorded_today.1.contains(&user.id))
            .collect();
        if pending.is_empty() {
            debug!("Snapshots for {} already recorded", snapshot_date);
            return Ok(None);
        }

        let report = self.record_users(run_at, snapshot_date, pending).await;
        recorded_today.1.extend(report.recorded.iter().cloned());
        Ok(Some(report))
    }

    /// Records a snapshot for every user regardless of the gate.
    ///
    /// A failure for one user is logged and reported; the others still run.
    pub async fn run_now(&self) -> Result<SnapshotRunReport> {
        let run_at = self.clock.now();
        let snapshot_date = valuation_date_from_utc(run_at, self.timezone);
        let users = self.user_repository.list_users()?;

        let mut recorded_today = self.recorded_today.lock().await;
        let report = self.record_users(run_at, snapshot_date, users).await;
        if recorded_today.0 != Some(snapshot_date) {
            *recorded_today = (Some(snapshot_date), HashSet::new());
        }
        recorded_today.1.extend(report.recorded.iter().cloned());
        Ok(report)
    }

    async fn record_users(
        &self,
        run_at: DateTime<Utc>,
        snapshot_date: NaiveDate,
        users: Vec<User>,
    ) -> SnapshotRunReport {
        let mut report = SnapshotRunReport {
            run_at,
            snapshot_date,
            recorded: Vec::with_capacity(users.len()),
            failed: Vec::new(),
        };

        for user in users {
            match self.snapshot_service.record_snapshot(&user.id).await {
                Ok(_) => report.recorded.push(user.id),
                Err(e) => {
                    error!("Snapshot for user {} failed: {}", user.id, e);
                    report.failed.push(UserSnapshotFailure {
                        user_id: user.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Snapshot run for {}: {} recorded, {} failed",
            report.snapshot_date,
            report.recorded.len(),
            report.failed.len()
        );
        report
    }
}
