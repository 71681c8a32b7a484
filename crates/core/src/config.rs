//! Engine-wide tunables.
//!
//! The server builds one [`EngineConfig`] from its environment and hands
//! clones to every service. Defaults match production policy.

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;

use crate::constants::{MARKET_CLOSE_HOUR, PRICE_BATCH_SIZE};
use crate::utils::time_utils::DEFAULT_VALUATION_TZ;

/// What the ledger boundary does with a withdrawal that exceeds the
/// available cash balance in its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NegativeCashPolicy {
    /// Accept it; the balance goes negative and is simply not shown as a holding.
    #[default]
    Allow,
    /// Reject the withdrawal with a validation error.
    Reject,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Max age of an in-process price cache entry.
    pub memory_price_ttl: Duration,
    /// Max age of a persisted price before a live fetch is attempted.
    pub stored_price_ttl: Duration,
    /// Max age of a persisted FX rate before a live fetch is attempted.
    pub fx_rate_ttl: Duration,
    /// Symbols fetched concurrently per chunk.
    pub price_batch_size: usize,
    /// Pause between price chunks.
    pub price_batch_pause: StdDuration,
    /// Local hour from which the snapshot gate opens.
    pub market_close_hour: u32,
    /// Timezone used for "today", the gate, and canonical snapshot time.
    pub timezone: Tz,
    pub negative_cash_policy: NegativeCashPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_price_ttl: Duration::minutes(5),
            stored_price_ttl: Duration::hours(1),
            fx_rate_ttl: Duration::hours(1),
            price_batch_size: PRICE_BATCH_SIZE,
            price_batch_pause: StdDuration::from_millis(1000),
            market_close_hour: MARKET_CLOSE_HOUR,
            timezone: DEFAULT_VALUATION_TZ,
            negative_cash_policy: NegativeCashPolicy::Allow,
        }
    }
}

impl EngineConfig {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_negative_cash_policy(mut self, policy: NegativeCashPolicy) -> Self {
        self.negative_cash_policy = policy;
        self
    }

    pub fn with_price_batch_pause(mut self, pause: StdDuration) -> Self {
        self.price_batch_pause = pause;
        self
    }
}
