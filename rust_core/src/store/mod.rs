//! Read-only storage seam used by the pricing engine.
//!
//! The engine only needs three snapshots per cycle. Backends:
//! - [`memory::MemoryStore`]: in-process, for embedding and tests
//! - [`crate::db::PgPricingStore`]: PostgreSQL via sqlx

use crate::models::{Order, Product, Service};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait PricingStore: Send + Sync {
    /// All services, active or not
    async fn get_services(&self) -> Result<Vec<Service>>;

    /// Orders created at or after `since`. Backends may return older orders
    /// too; the engine applies the demand window itself.
    async fn get_orders(&self, since: DateTime<Utc>) -> Result<Vec<Order>>;

    /// Current inventory levels
    async fn get_products(&self) -> Result<Vec<Product>>;

    /// Backend name for logging
    fn store_name(&self) -> &str;
}
