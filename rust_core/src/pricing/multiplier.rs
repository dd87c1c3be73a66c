//! Weighted multiplier model.
//!
//! Each factor contributes `weight * (signal - baseline)` on top of 1.0:
//!
//! | factor       | weight | signal        | baseline |
//! |--------------|--------|---------------|----------|
//! | demand       | 0.30   | demand        | 0.5      |
//! | inventory    | 0.20   | 1 - inventory | 0.2      |
//! | time_of_day  | 0.10   | time_of_day   | 0.7      |
//! | day_of_week  | 0.10   | day_of_week   | 0.8      |
//! | seasonality  | 0.15   | seasonality   | 0.8      |
//! | local_events | 0.25   | local_events  | 0.0      |
//!
//! Inventory is inverted so that scarce stock raises the price. The
//! baselines are the values in [`PricingFactors::NEUTRAL`], so a neutral
//! snapshot quotes the base price unchanged. The result is clamped to the
//! configured bounds, [0.5, 2.0] by default.

use crate::error::{PricingError, Result};
use crate::models::PricingFactors;
use crate::utils::money::apply_multiplier;
use serde::{Deserialize, Serialize};

const BASELINE_DEMAND: f64 = 0.5;
const BASELINE_SCARCITY: f64 = 0.2;
const BASELINE_TIME_OF_DAY: f64 = 0.7;
const BASELINE_DAY_OF_WEEK: f64 = 0.8;
const BASELINE_SEASONALITY: f64 = 0.8;
const BASELINE_LOCAL_EVENTS: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub demand: f64,
    pub inventory: f64,
    pub time_of_day: f64,
    pub day_of_week: f64,
    pub seasonality: f64,
    pub local_events: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            demand: 0.30,
            inventory: 0.20,
            time_of_day: 0.10,
            day_of_week: 0.10,
            seasonality: 0.15,
            local_events: 0.25,
        }
    }
}

impl FactorWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("demand", self.demand),
            ("inventory", self.inventory),
            ("time_of_day", self.time_of_day),
            ("day_of_week", self.day_of_week),
            ("seasonality", self.seasonality),
            ("local_events", self.local_events),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PricingError::InvalidConfig(format!(
                    "weight for {} must be finite and >= 0, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Clamp a factor into [0, 1]; NaN falls back to `neutral`.
fn sanitize(value: f64, neutral: f64) -> f64 {
    if value.is_nan() {
        neutral
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Combines factors into a bounded price multiplier.
#[derive(Debug, Clone, Copy)]
pub struct PriceAggregator {
    weights: FactorWeights,
    min_multiplier: f64,
    max_multiplier: f64,
}

impl Default for PriceAggregator {
    fn default() -> Self {
        Self::new(FactorWeights::default(), 0.5, 2.0)
    }
}

impl PriceAggregator {
    pub fn new(weights: FactorWeights, min_multiplier: f64, max_multiplier: f64) -> Self {
        Self {
            weights,
            min_multiplier,
            max_multiplier,
        }
    }

    /// Unclamped `1.0 + Σ contributions`.
    pub fn raw_multiplier(&self, factors: &PricingFactors) -> f64 {
        let n = PricingFactors::NEUTRAL;
        let w = &self.weights;

        let demand = sanitize(factors.demand, n.demand);
        let scarcity = 1.0 - sanitize(factors.inventory, n.inventory);
        let time_of_day = sanitize(factors.time_of_day, n.time_of_day);
        let day_of_week = sanitize(factors.day_of_week, n.day_of_week);
        let seasonality = sanitize(factors.seasonality, n.seasonality);
        let local_events = sanitize(factors.local_events, n.local_events);

        1.0 + w.demand * (demand - BASELINE_DEMAND)
            + w.inventory * (scarcity - BASELINE_SCARCITY)
            + w.time_of_day * (time_of_day - BASELINE_TIME_OF_DAY)
            + w.day_of_week * (day_of_week - BASELINE_DAY_OF_WEEK)
            + w.seasonality * (seasonality - BASELINE_SEASONALITY)
            + w.local_events * (local_events - BASELINE_LOCAL_EVENTS)
    }

    /// Multiplier clamped to the configured bounds.
    pub fn multiplier(&self, factors: &PricingFactors) -> f64 {
        let raw = self.raw_multiplier(factors);
        if !raw.is_finite() {
            return 1.0;
        }
        raw.clamp(self.min_multiplier, self.max_multiplier)
    }

    /// Returns `(multiplier, price)` with the price rounded to cents.
    pub fn price(&self, base_price: f64, factors: &PricingFactors) -> (f64, f64) {
        let multiplier = self.multiplier(factors);
        (multiplier, apply_multiplier(base_price, multiplier))
    }
}
