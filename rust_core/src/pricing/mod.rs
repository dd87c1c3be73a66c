//! Dynamic pricing: factor calculation, multiplier aggregation, the engine
//! holding current rules, and the refresh scheduler.

pub mod engine;
pub mod events;
pub mod factors;
pub mod multiplier;
pub mod scheduler;

pub use engine::{EngineStats, EngineStatsSnapshot, PricingEngine};
pub use events::{EventCalendar, LocalEvent};
pub use factors::FactorCalculator;
pub use multiplier::{FactorWeights, PriceAggregator};
pub use scheduler::{RefreshScheduler, SchedulerConfig};

use crate::error::{PricingError, Result};
use chrono_tz::Tz;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Longest accepted demand window (one year)
pub const MAX_DEMAND_WINDOW_HOURS: u64 = 365 * 24;

/// Tunables for the pricing engine
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// How often every tracked service is re-priced
    pub refresh_interval: Duration,
    /// Orders newer than this count towards demand
    pub demand_window: chrono::Duration,
    /// Recent order count at which demand saturates at 1.0
    pub demand_saturation: u32,
    /// Inventory factor used when no product matches the service category
    pub default_inventory: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    pub weights: FactorWeights,
    /// Business time zone for hour/weekday/month lookups
    pub timezone: Tz,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300), // 5 minutes
            demand_window: chrono::Duration::hours(24),
            demand_saturation: 10,
            default_inventory: 0.8,
            min_multiplier: 0.5,
            max_multiplier: 2.0,
            weights: FactorWeights::default(),
            timezone: chrono_tz::Asia::Kolkata,
        }
    }
}

impl PricingConfig {
    /// Load from `PRICING_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timezone = match env::var("PRICING_TIMEZONE") {
            Ok(name) => Tz::from_str(name.trim()).map_err(|_| {
                PricingError::InvalidConfig(format!(
                    "PRICING_TIMEZONE {} is not an IANA time zone (e.g. Asia/Kolkata)",
                    name
                ))
            })?,
            Err(_) => defaults.timezone,
        };

        let window_hours = parse_u64("PRICING_DEMAND_WINDOW_HOURS", 24)?;

        let config = Self {
            refresh_interval: Duration::from_secs(parse_u64(
                "PRICING_REFRESH_INTERVAL_SECS",
                defaults.refresh_interval.as_secs(),
            )?),
            demand_window: demand_window_from_hours(window_hours)?,
            demand_saturation: parse_u32("PRICING_DEMAND_SATURATION", defaults.demand_saturation)?,
            default_inventory: parse_f64("PRICING_DEFAULT_INVENTORY", defaults.default_inventory)?,
            min_multiplier: parse_f64("PRICING_MIN_MULTIPLIER", defaults.min_multiplier)?,
            max_multiplier: parse_f64("PRICING_MAX_MULTIPLIER", defaults.max_multiplier)?,
            weights: defaults.weights,
            timezone,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(PricingError::InvalidConfig(
                "refresh interval must be > 0".to_string(),
            ));
        }
        if self.demand_window <= chrono::Duration::zero() {
            return Err(PricingError::InvalidConfig(
                "demand window must be > 0".to_string(),
            ));
        }
        if self.demand_window.num_hours() > MAX_DEMAND_WINDOW_HOURS as i64 {
            return Err(PricingError::InvalidConfig(format!(
                "demand window must be at most {}h, got {}h",
                MAX_DEMAND_WINDOW_HOURS,
                self.demand_window.num_hours()
            )));
        }
        if self.demand_saturation == 0 {
            return Err(PricingError::InvalidConfig(
                "demand saturation must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.default_inventory) {
            return Err(PricingError::InvalidConfig(
                "default inventory must be between 0 and 1".to_string(),
            ));
        }
        if !(self.min_multiplier > 0.0 && self.min_multiplier <= 1.0) {
            return Err(PricingError::InvalidConfig(format!(
                "min multiplier must be in (0, 1], got {}",
                self.min_multiplier
            )));
        }
        if !(self.max_multiplier >= 1.0 && self.max_multiplier.is_finite()) {
            return Err(PricingError::InvalidConfig(format!(
                "max multiplier must be finite and >= 1, got {}",
                self.max_multiplier
            )));
        }
        self.weights.validate()
    }
}

fn demand_window_from_hours(hours: u64) -> Result<chrono::Duration> {
    if hours > MAX_DEMAND_WINDOW_HOURS {
        return Err(PricingError::InvalidConfig(format!(
            "PRICING_DEMAND_WINDOW_HOURS must be at most {}, got {}",
            MAX_DEMAND_WINDOW_HOURS, hours
        )));
    }
    i64::try_from(hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .ok_or_else(|| {
            PricingError::InvalidConfig(format!(
                "PRICING_DEMAND_WINDOW_HOURS {} is out of range",
                hours
            ))
        })
}

fn parse_f64(var_name: &str, default: f64) -> Result<f64> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| PricingError::InvalidConfig(format!("{} must be a valid f64", var_name))),
        Err(_) => Ok(default),
    }
}

fn parse_u64(var_name: &str, default: u64) -> Result<u64> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| PricingError::InvalidConfig(format!("{} must be a valid u64", var_name))),
        Err(_) => Ok(default),
    }
}

fn parse_u32(var_name: &str, default: u32) -> Result<u32> {
    let value = parse_u64(var_name, default as u64)?;
    u32::try_from(value).map_err(|_| {
        PricingError::InvalidConfig(format!("{} must fit in u32, got {}", var_name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.demand_saturation, 10);
        assert_eq!(config.min_multiplier, 0.5);
        assert_eq!(config.max_multiplier, 2.0);
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let config = PricingConfig {
            min_multiplier: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PricingError::InvalidConfig(_))));

        let config = PricingConfig {
            max_multiplier: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_interval_and_saturation() {
        let config = PricingConfig {
            refresh_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PricingConfig {
            demand_saturation: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_demand_window() {
        let config = PricingConfig {
            demand_window: chrono::Duration::hours(10_000_000_000),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PricingError::InvalidConfig(_))));

        let config = PricingConfig {
            demand_window: chrono::Duration::hours(MAX_DEMAND_WINDOW_HOURS as i64),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demand_window_from_hours() {
        assert_eq!(
            demand_window_from_hours(48).unwrap(),
            chrono::Duration::hours(48)
        );
        assert!(demand_window_from_hours(MAX_DEMAND_WINDOW_HOURS + 1).is_err());
        assert!(matches!(
            demand_window_from_hours(3_000_000_000_000_000),
            Err(PricingError::InvalidConfig(_))
        ));
        assert!(demand_window_from_hours(u64::MAX).is_err());
    }

    #[test]
    fn test_parse_u32_rejects_overflow() {
        let var = "PRICING_TEST_SATURATION_OVERFLOW";
        std::env::set_var(var, "4294967306");
        let result = parse_u32(var, 10);
        std::env::remove_var(var);
        assert!(matches!(result, Err(PricingError::InvalidConfig(_))));
    }

    // Other env-driven parsing is exercised only through unset variables to
    // keep tests independent of each other.
    #[test]
    fn test_parse_with_default() {
        assert_eq!(parse_f64("NON_EXISTENT_PRICING_VAR_F", 0.8).unwrap(), 0.8);
        assert_eq!(parse_u64("NON_EXISTENT_PRICING_VAR_U", 300).unwrap(), 300);
        assert_eq!(parse_u32("NON_EXISTENT_PRICING_VAR_U32", 10).unwrap(), 10);
    }
}
