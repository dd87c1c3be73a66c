//! Database health checks.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub async fn check_pool_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database health check failed")?;
    Ok(())
}

#[derive(Clone, Debug)]
pub struct PoolHealthConfig {
    pub check_interval: Duration,
    /// Consecutive failures before escalating to error level
    pub alert_threshold: u32,
    pub enabled: bool,
}

impl Default for PoolHealthConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(60),
            alert_threshold: 3,
            enabled: true,
        }
    }
}

impl PoolHealthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            check_interval: std::env::var("DB_HEALTH_CHECK_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.check_interval),
            alert_threshold: std::env::var("DB_HEALTH_ALERT_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.alert_threshold),
            enabled: std::env::var("DB_HEALTH_CHECK_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enabled),
        }
    }
}

/// Periodically pings the pool so a dead database shows up in the logs
/// before the next pricing refresh fails.
pub struct PoolHealthMonitor {
    pool: PgPool,
    config: PoolHealthConfig,
}

impl PoolHealthMonitor {
    pub fn new(pool: PgPool, config: PoolHealthConfig) -> Self {
        Self { pool, config }
    }

    pub fn spawn(self) -> Option<JoinHandle<()>> {
        if !self.config.enabled || self.config.check_interval.is_zero() {
            info!("Database health monitoring is disabled");
            return None;
        }
        Some(tokio::spawn(self.run()))
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.check_interval);
        let mut consecutive_failures = 0u32;

        loop {
            ticker.tick().await;
            match check_pool_health(&self.pool).await {
                Ok(()) => {
                    if consecutive_failures > 0 {
                        info!(
                            "Database connection recovered after {} failed checks",
                            consecutive_failures
                        );
                    }
                    consecutive_failures = 0;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    if consecutive_failures >= self.config.alert_threshold {
                        error!(
                            "Database unreachable for {} consecutive checks: {}",
                            consecutive_failures, e
                        );
                    } else {
                        warn!(
                            "Database health check failed ({}/{}): {}",
                            consecutive_failures, self.config.alert_threshold, e
                        );
                    }
                }
            }
        }
    }
}
