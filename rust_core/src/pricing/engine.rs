//! PricingEngine: owns the in-memory pricing rule table.
//!
//! Rules are rebuilt from a fresh store snapshot on each refresh. A cycle
//! computes every rule first and then swaps the whole table in under one
//! write lock, so readers never see a half-updated table. A failed refresh
//! leaves the previous rules untouched.

use crate::error::{PricingError, Result};
use crate::models::{Order, PricingFactors, PricingRule, Product, Service};
use crate::pricing::events::EventCalendar;
use crate::pricing::factors::FactorCalculator;
use crate::pricing::multiplier::PriceAggregator;
use crate::pricing::PricingConfig;
use crate::store::PricingStore;
use crate::utils::money::round_to_cents;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct EngineStats {
    pub cycles_run: AtomicU64,
    pub cycles_failed: AtomicU64,
    pub services_priced: AtomicU64,
    last_success: RwLock<Option<DateTime<Utc>>>,
}

impl EngineStats {
    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            cycles_run: self.cycles_run.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
            services_priced: self.services_priced.load(Ordering::Relaxed),
            last_success: *self.last_success.read(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatsSnapshot {
    pub cycles_run: u64,
    pub cycles_failed: u64,
    /// Total service re-pricings across all successful cycles
    pub services_priced: u64,
    pub last_success: Option<DateTime<Utc>>,
}

pub struct PricingEngine {
    store: Arc<dyn PricingStore>,
    calculator: FactorCalculator,
    aggregator: PriceAggregator,
    rules: RwLock<FxHashMap<String, PricingRule>>,
    stats: EngineStats,
}

impl PricingEngine {
    pub fn new(
        store: Arc<dyn PricingStore>,
        config: &PricingConfig,
        calendar: EventCalendar,
    ) -> Result<Self> {
        config.validate()?;

        info!(
            "Pricing engine using {} store (window={}h, saturation={}, \
             bounds=[{}, {}], tz={}, events={})",
            store.store_name(),
            config.demand_window.num_hours(),
            config.demand_saturation,
            config.min_multiplier,
            config.max_multiplier,
            config.timezone,
            calendar.len()
        );

        Ok(Self {
            store,
            calculator: FactorCalculator::new(config, calendar),
            aggregator: PriceAggregator::new(
                config.weights,
                config.min_multiplier,
                config.max_multiplier,
            ),
            rules: RwLock::new(FxHashMap::default()),
            stats: EngineStats::default(),
        })
    }

    /// Seed a rule at base price for every active service not yet tracked.
    /// Returns the number of rules added.
    pub async fn initialize(&self) -> Result<usize> {
        let services = self.store.get_services().await?;
        let now = Utc::now();

        let mut rules = self.rules.write();
        let mut added = 0;
        for service in services.iter().filter(|s| s.is_active()) {
            if !rules.contains_key(&service.id) {
                rules.insert(service.id.clone(), PricingRule::seeded(service, now));
                added += 1;
            }
        }

        info!("Seeded {} pricing rules from base prices", added);
        Ok(added)
    }

    pub async fn update_all_pricing(&self) -> Result<usize> {
        self.update_all_pricing_at(Utc::now()).await
    }

    /// Re-price every active service as of `now`. Rules for services that
    /// were removed or deactivated are dropped.
    pub async fn update_all_pricing_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let (services, orders, products) = self.fetch_snapshot(now).await?;
        let counts = self.calculator.recent_order_counts(&orders, now);

        let fresh: FxHashMap<String, PricingRule> = services
            .iter()
            .filter(|s| s.is_active())
            .map(|service| {
                let recent = counts.get(service.id.as_str()).copied().unwrap_or(0);
                let rule = self.build_rule(service, recent, &products, now);
                (service.id.clone(), rule)
            })
            .collect();

        let priced = fresh.len();
        let dropped = {
            let mut rules = self.rules.write();
            let dropped = rules.keys().filter(|id| !fresh.contains_key(*id)).count();
            *rules = fresh;
            dropped
        };

        if dropped > 0 {
            info!(
                "Dropped {} pricing rules for inactive or removed services",
                dropped
            );
        }
        info!(
            "Updated pricing for {} services ({} recent orders, {} products)",
            priced,
            orders.len(),
            products.len()
        );

        Ok(priced)
    }

    pub async fn update_service_pricing(&self, service_id: &str) -> Result<PricingRule> {
        self.update_service_pricing_at(service_id, Utc::now()).await
    }

    /// Re-price a single service from a fresh snapshot.
    pub async fn update_service_pricing_at(
        &self,
        service_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PricingRule> {
        let (services, orders, products) = self.fetch_snapshot(now).await?;

        let Some(service) = services.iter().find(|s| s.id == service_id) else {
            self.rules.write().remove(service_id);
            return Err(PricingError::ServiceNotFound(service_id.to_string()));
        };
        if !service.is_active() {
            self.rules.write().remove(service_id);
            return Err(PricingError::ServiceInactive(service_id.to_string()));
        }

        let counts = self.calculator.recent_order_counts(&orders, now);
        let recent = counts.get(service_id).copied().unwrap_or(0);
        let rule = self.build_rule(service, recent, &products, now);

        self.rules.write().insert(service_id.to_string(), rule.clone());
        Ok(rule)
    }

    /// One scheduler tick: refresh everything, logging and swallowing failures.
    /// Returns whether the cycle succeeded.
    pub async fn run_cycle(&self) -> bool {
        self.stats.cycles_run.fetch_add(1, Ordering::Relaxed);

        match self.update_all_pricing().await {
            Ok(priced) => {
                self.stats
                    .services_priced
                    .fetch_add(priced as u64, Ordering::Relaxed);
                *self.stats.last_success.write() = Some(Utc::now());
                true
            }
            Err(e) => {
                self.stats.cycles_failed.fetch_add(1, Ordering::Relaxed);
                warn!("Pricing refresh failed, keeping previous prices: {}", e);
                false
            }
        }
    }

    pub fn get_service_pricing(&self, service_id: &str) -> Option<PricingRule> {
        self.rules.read().get(service_id).cloned()
    }

    /// All rules, ordered by service id.
    pub fn get_all_pricing(&self) -> Vec<PricingRule> {
        let mut rules: Vec<PricingRule> = self.rules.read().values().cloned().collect();
        rules.sort_by(|a, b| a.service_id.cmp(&b.service_id));
        rules
    }

    pub fn get_pricing_factors(&self, service_id: &str) -> Option<PricingFactors> {
        self.rules.read().get(service_id).map(|r| r.factors)
    }

    /// Current dynamic price, or the service's base price if no rule exists.
    pub async fn get_recommended_price(&self, service_id: &str) -> Result<f64> {
        if let Some(rule) = self.get_service_pricing(service_id) {
            return Ok(rule.current_price);
        }

        let services = self.store.get_services().await?;
        let service = services
            .into_iter()
            .find(|s| s.id == service_id)
            .ok_or_else(|| PricingError::ServiceNotFound(service_id.to_string()))?;

        debug!(
            "No pricing rule for {}, falling back to base price {:.2}",
            service_id, service.base_price
        );
        Ok(round_to_cents(service.base_price))
    }

    pub fn tracked_services(&self) -> usize {
        self.rules.read().len()
    }

    pub fn stats(&self) -> EngineStatsSnapshot {
        self.stats.snapshot()
    }

    async fn fetch_snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Service>, Vec<Order>, Vec<Product>)> {
        let since = self.calculator.window_start(now);
        let (services, orders, products) = tokio::try_join!(
            self.store.get_services(),
            self.store.get_orders(since),
            self.store.get_products(),
        )?;
        Ok((services, orders, products))
    }

    fn build_rule(
        &self,
        service: &Service,
        recent_orders: usize,
        products: &[Product],
        now: DateTime<Utc>,
    ) -> PricingRule {
        let factors = self
            .calculator
            .calculate(service, recent_orders, products, now);
        let (multiplier, price) = self.aggregator.price(service.base_price, &factors);

        debug!(
            "{} ({}): base={:.2} x{:.3} -> {:.2} [{}]",
            service.id, service.name, service.base_price, multiplier, price, factors
        );

        PricingRule {
            service_id: service.id.clone(),
            base_price: service.base_price,
            current_price: price,
            price_multiplier: multiplier,
            factors,
            last_updated: now,
        }
    }
}
