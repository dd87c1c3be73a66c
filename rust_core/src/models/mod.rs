//! Store data consumed by the pricing engine and the pricing records it produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Catalogue and order snapshots
// ============================================================================

/// Whether a service is currently offered at the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Active,
    Inactive,
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown service status: {}", other)),
        }
    }
}

/// A priced service on the store menu (wash & fold, dry clean, ironing...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Category used to match inventory products (e.g. "dry_cleaning")
    pub category: String,
    /// List price before any dynamic adjustment
    pub base_price: f64,
    #[serde(default)]
    pub status: ServiceStatus,
}

impl Service {
    pub fn new(id: &str, name: &str, category: &str, base_price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            base_price,
            status: ServiceStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ServiceStatus::Active
    }
}

/// Order lifecycle, from counter drop-off to delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Created,
    PickedUp,
    Processing,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Cancelled orders never represent demand.
    pub fn counts_as_demand(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" | "pending" => Ok(Self::Created),
            "picked_up" => Ok(Self::PickedUp),
            "processing" | "in_progress" => Ok(Self::Processing),
            "completed" | "ready" => Ok(Self::Completed),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub service_id: String,
    pub status: OrderStatus,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// An inventory item (detergent, hangers, garment bags...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: f64,
    /// Stock level considered "full"; items with no capacity are ignored
    pub max_stock: f64,
}

impl Product {
    /// Fraction of capacity in stock, clamped to [0, 1]. `None` when the
    /// product has no usable capacity figure.
    pub fn stock_ratio(&self) -> Option<f64> {
        if !(self.max_stock > 0.0) || !self.stock_quantity.is_finite() {
            return None;
        }
        Some((self.stock_quantity / self.max_stock).clamp(0.0, 1.0))
    }

    pub fn matches_category(&self, category: &str) -> bool {
        self.category.trim().eq_ignore_ascii_case(category.trim())
    }
}

// ============================================================================
// Pricing records
// ============================================================================

/// The six normalized inputs to the multiplier, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingFactors {
    pub demand: f64,
    pub inventory: f64,
    pub time_of_day: f64,
    pub day_of_week: f64,
    pub seasonality: f64,
    pub local_events: f64,
}

impl PricingFactors {
    /// Factors that reproduce the base price exactly; used to seed new rules.
    pub const NEUTRAL: PricingFactors = PricingFactors {
        demand: 0.5,
        inventory: 0.8,
        time_of_day: 0.7,
        day_of_week: 0.8,
        seasonality: 0.8,
        local_events: 0.0,
    };

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.demand,
            self.inventory,
            self.time_of_day,
            self.day_of_week,
            self.seasonality,
            self.local_events,
        ]
    }
}

impl Default for PricingFactors {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for PricingFactors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "demand={:.2} inventory={:.2} hour={:.2} weekday={:.2} season={:.2} events={:.2}",
            self.demand,
            self.inventory,
            self.time_of_day,
            self.day_of_week,
            self.seasonality,
            self.local_events
        )
    }
}

/// Current dynamic price of one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub service_id: String,
    pub base_price: f64,
    pub current_price: f64,
    pub price_multiplier: f64,
    pub factors: PricingFactors,
    pub last_updated: DateTime<Utc>,
}

impl PricingRule {
    /// Rule seeded from the list price, before the first refresh.
    pub fn seeded(service: &Service, now: DateTime<Utc>) -> Self {
        Self {
            service_id: service.id.clone(),
            base_price: service.base_price,
            current_price: service.base_price,
            price_multiplier: 1.0,
            factors: PricingFactors::NEUTRAL,
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: f64, max: f64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Solvent".to_string(),
            category: "Dry_Cleaning ".to_string(),
            stock_quantity: stock,
            max_stock: max,
        }
    }

    #[test]
    fn test_stock_ratio_clamped() {
        assert_eq!(product(5.0, 10.0).stock_ratio(), Some(0.5));
        assert_eq!(product(30.0, 10.0).stock_ratio(), Some(1.0));
        assert_eq!(product(-2.0, 10.0).stock_ratio(), Some(0.0));
    }

    #[test]
    fn test_stock_ratio_without_capacity() {
        assert_eq!(product(5.0, 0.0).stock_ratio(), None);
        assert_eq!(product(5.0, f64::NAN).stock_ratio(), None);
    }

    #[test]
    fn test_category_match_ignores_case_and_whitespace() {
        assert!(product(1.0, 1.0).matches_category("dry_cleaning"));
        assert!(!product(1.0, 1.0).matches_category("ironing"));
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!("Picked_Up".parse::<OrderStatus>().unwrap(), OrderStatus::PickedUp);
        assert_eq!("canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("lost".parse::<OrderStatus>().is_err());
        assert!(!OrderStatus::Cancelled.counts_as_demand());
        assert!(OrderStatus::Delivered.counts_as_demand());
    }

    #[test]
    fn test_seeded_rule_uses_base_price() {
        let service = Service::new("s1", "Wash & Fold", "laundry", 120.0);
        let rule = PricingRule::seeded(&service, Utc::now());
        assert_eq!(rule.current_price, 120.0);
        assert_eq!(rule.price_multiplier, 1.0);
        assert_eq!(rule.factors, PricingFactors::NEUTRAL);
    }
}
