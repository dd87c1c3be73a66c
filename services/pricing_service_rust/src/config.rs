//! Configuration for pricing_service_rust

use anyhow::{anyhow, Context, Result};
use laundry_pricing_core::db::{DbPoolConfig, PoolHealthConfig};
use laundry_pricing_core::{PricingConfig, SchedulerConfig};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PricingServiceConfig {
    pub service_id: String,

    // Database
    pub database_url: String,
    pub db_pool: DbPoolConfig,
    pub db_health: PoolHealthConfig,

    // Pricing model
    pub pricing: PricingConfig,
    pub events_file: Option<PathBuf>,

    // Monitoring
    pub stats_log_every: u64,
}

impl PricingServiceConfig {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow!("DATABASE_URL must be set"))?;

        let pricing = PricingConfig::from_env().context("Invalid PRICING_* configuration")?;

        let events_file = env::var("PRICING_EVENTS_FILE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            service_id: env::var("PRICING_SERVICE_ID").unwrap_or_else(|_| "pricing_1".to_string()),
            database_url,
            db_pool: DbPoolConfig::from_env(),
            db_health: PoolHealthConfig::from_env(),
            pricing,
            events_file,
            stats_log_every: parse_u64("PRICING_STATS_LOG_EVERY", 12)?,
        })
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: self.pricing.refresh_interval,
            stats_log_every: self.stats_log_every,
        }
    }
}

/// Parse environment variable as u64 with default fallback
fn parse_u64(var_name: &str, default: u64) -> Result<u64> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid u64", var_name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_u64_with_default() {
        assert_eq!(parse_u64("NON_EXISTENT_PRICING_SERVICE_VAR", 12).unwrap(), 12);
    }

    #[test]
    fn test_scheduler_config_follows_refresh_interval() {
        let config = PricingServiceConfig {
            service_id: "pricing_test".to_string(),
            database_url: "postgres://localhost/fabzclean".to_string(),
            db_pool: DbPoolConfig::default(),
            db_health: PoolHealthConfig::default(),
            pricing: PricingConfig {
                refresh_interval: Duration::from_secs(60),
                ..Default::default()
            },
            events_file: None,
            stats_log_every: 5,
        };

        let scheduler = config.scheduler();
        assert_eq!(scheduler.interval, Duration::from_secs(60));
        assert_eq!(scheduler.stats_log_every, 5);
    }
}
