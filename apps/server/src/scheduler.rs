//! Background loop driving the end-of-day snapshot gate.
//!
//! Ticks on a fixed interval and calls the gated entry point; the gate itself
//! decides whether today's snapshots are due and skips users already recorded
//! for the local date.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

pub fn start_snapshot_scheduler(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Snapshot scheduler started ({}s interval)", every.as_secs());

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_scheduled_snapshots(&state).await;
        }
    })
}

async fn run_scheduled_snapshots(state: &Arc<AppState>) {
    match state.snapshot_scheduler.run_if_due().await {
        Ok(None) => debug!("No snapshots due"),
        Ok(Some(report)) => {
            if report.failed.is_empty() {
                info!(
                    "Recorded {} snapshots for {}",
                    report.recorded.len(),
                    report.snapshot_date
                );
            } else {
                warn!(
                    "Recorded {} snapshots for {}, {} users failed",
                    report.recorded.len(),
                    report.snapshot_date,
                    report.failed.len()
                );
            }
        }
        Err(e) => warn!("Scheduled snapshot run failed: {}", e),
    }
}
