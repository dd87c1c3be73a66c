//! In-memory `PricingStore`.

use super::PricingStore;
use crate::models::{Order, Product, Service};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    services: RwLock<Vec<Service>>,
    orders: RwLock<Vec<Order>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<Service>) -> Self {
        Self {
            services: RwLock::new(services),
            ..Default::default()
        }
    }

    /// Insert or replace a service by id.
    pub fn upsert_service(&self, service: Service) {
        let mut services = self.services.write();
        match services.iter_mut().find(|s| s.id == service.id) {
            Some(existing) => *existing = service,
            None => services.push(service),
        }
    }

    pub fn remove_service(&self, service_id: &str) -> bool {
        let mut services = self.services.write();
        let before = services.len();
        services.retain(|s| s.id != service_id);
        services.len() != before
    }

    pub fn add_order(&self, order: Order) {
        self.orders.write().push(order);
    }

    pub fn add_orders(&self, orders: impl IntoIterator<Item = Order>) {
        self.orders.write().extend(orders);
    }

    /// Insert or replace a product by id.
    pub fn upsert_product(&self, product: Product) {
        let mut products = self.products.write();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }
}

#[async_trait]
impl PricingStore for MemoryStore {
    async fn get_services(&self) -> Result<Vec<Service>> {
        Ok(self.services.read().clone())
    }

    async fn get_orders(&self, since: DateTime<Utc>) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|o| o.created_at >= since)
            .cloned()
            .collect())
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().clone())
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}
