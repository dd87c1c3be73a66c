//! Per-service factor calculation from an order/product snapshot.

use crate::models::{Order, PricingFactors, Product, Service};
use crate::pricing::events::EventCalendar;
use crate::pricing::PricingConfig;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use rustc_hash::FxHashMap;

/// Peak counter hours: morning drop-off and the afternoon pick-up rush.
const PEAK_HOURS: [u32; 7] = [9, 10, 11, 14, 15, 16, 17];
const SHOULDER_HOURS: [u32; 5] = [8, 12, 13, 18, 19];

/// Demand in [0, 1]: linear in the recent order count, saturating at
/// `saturation` orders.
pub fn demand_from_count(recent_orders: usize, saturation: u32) -> f64 {
    let saturation = saturation.max(1) as f64;
    (recent_orders as f64 / saturation).min(1.0)
}

pub fn time_of_day_factor(hour: u32) -> f64 {
    if PEAK_HOURS.contains(&hour) {
        1.0
    } else if SHOULDER_HOURS.contains(&hour) {
        0.7
    } else {
        0.3
    }
}

pub fn day_of_week_factor(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Mon => 0.9,
        Weekday::Tue => 0.7,
        Weekday::Wed => 0.7,
        Weekday::Thu => 0.8,
        Weekday::Fri => 0.9,
        Weekday::Sat => 1.0,
        Weekday::Sun => 0.5,
    }
}

/// Month is 1-based. Festive and wedding months (Oct-Dec) run hottest,
/// the January lull coolest.
pub fn seasonality_factor(month: u32) -> f64 {
    match month {
        1 | 2 => 0.6,
        3 => 0.7,
        4 => 0.8,
        5 => 0.9,
        6 => 0.8,
        7 | 8 => 0.7,
        9 => 0.8,
        10 | 11 => 1.0,
        12 => 0.9,
        _ => 0.8,
    }
}

/// Computes the six pricing factors for a service.
#[derive(Debug, Clone)]
pub struct FactorCalculator {
    demand_window: chrono::Duration,
    demand_saturation: u32,
    default_inventory: f64,
    timezone: Tz,
    calendar: EventCalendar,
}

impl FactorCalculator {
    pub fn new(config: &PricingConfig, calendar: EventCalendar) -> Self {
        Self {
            demand_window: config.demand_window,
            demand_saturation: config.demand_saturation,
            default_inventory: config.default_inventory,
            timezone: config.timezone,
            calendar,
        }
    }

    /// Start of the demand window ending at `now`, saturating at the
    /// earliest representable instant.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.demand_window).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Count orders per service inside the demand window. Cancelled orders
    /// and orders stamped after `now` are skipped.
    pub fn recent_order_counts<'a>(
        &self,
        orders: &'a [Order],
        now: DateTime<Utc>,
    ) -> FxHashMap<&'a str, usize> {
        let since = self.window_start(now);
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for order in orders {
            let in_window = order.created_at >= since && order.created_at <= now;
            if order.status.counts_as_demand() && in_window {
                *counts.entry(order.service_id.as_str()).or_default() += 1;
            }
        }
        counts
    }

    pub fn demand_factor(&self, recent_orders: usize) -> f64 {
        demand_from_count(recent_orders, self.demand_saturation)
    }

    /// Average stock ratio of products in the service's category.
    pub fn inventory_factor(&self, category: &str, products: &[Product]) -> f64 {
        let ratios: Vec<f64> = products
            .iter()
            .filter(|p| p.matches_category(category))
            .filter_map(|p| p.stock_ratio())
            .collect();

        if ratios.is_empty() {
            return self.default_inventory;
        }
        ratios.iter().sum::<f64>() / ratios.len() as f64
    }

    pub fn calculate(
        &self,
        service: &Service,
        recent_orders: usize,
        products: &[Product],
        now: DateTime<Utc>,
    ) -> PricingFactors {
        let local = now.with_timezone(&self.timezone);

        PricingFactors {
            demand: self.demand_factor(recent_orders),
            inventory: self.inventory_factor(&service.category, products),
            time_of_day: time_of_day_factor(local.hour()),
            day_of_week: day_of_week_factor(local.weekday()),
            seasonality: seasonality_factor(local.month()),
            local_events: self.calendar.factor_for(&service.category, local.date_naive()),
        }
    }
}
