use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use tallyfolio_core::{EngineConfig, NegativeCashPolicy};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub timezone: Tz,
    pub scheduler_enabled: bool,
    pub scheduler_interval: Duration,
    pub allow_negative_cash: bool,
    pub price_batch_pause: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("TF_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid TF_LISTEN_ADDR")?;
        let db_path = env_or("TF_DB_PATH", "./db/tallyfolio.db");
        let cors_allow = env_or("TF_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("TF_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let timezone: Tz = env_or("TF_TIMEZONE", "America/New_York")
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid TF_TIMEZONE: {}", e))?;
        let interval_secs: u64 = env_or("TF_SCHEDULER_INTERVAL_SECS", "900")
            .parse()
            .unwrap_or(900);
        let pause_ms: u64 = env_or("TF_PRICE_BATCH_PAUSE_MS", "1000")
            .parse()
            .unwrap_or(1000);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            timezone,
            scheduler_enabled: env_flag("TF_SCHEDULER_ENABLED", true),
            scheduler_interval: Duration::from_secs(interval_secs.max(1)),
            allow_negative_cash: env_flag("TF_ALLOW_NEGATIVE_CASH", true),
            price_batch_pause: Duration::from_millis(pause_ms),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        let policy = if self.allow_negative_cash {
            NegativeCashPolicy::Allow
        } else {
            NegativeCashPolicy::Reject
        };
        EngineConfig::default()
            .with_timezone(self.timezone)
            .with_negative_cash_policy(policy)
            .with_price_batch_pause(self.price_batch_pause)
    }
}
