//! Laundry pricing core - dynamic service pricing for laundry and dry-cleaning stores.
//!
//! This crate provides:
//! - Six-factor pricing model (demand, inventory, time of day, day of week,
//!   seasonality, local events)
//! - Weighted, bounded price multiplier with cent-precision quotes
//! - `PricingEngine` holding the current rule for every active service
//! - Fixed-interval refresh scheduler
//! - Storage seam with in-memory and PostgreSQL backends
//!
//! ```ignore
//! let store = Arc::new(PgPricingStore::new(pool));
//! let engine = Arc::new(PricingEngine::new(store, &PricingConfig::from_env()?, calendar)?);
//! engine.initialize().await?;
//! let mut scheduler = RefreshScheduler::start(engine.clone(), SchedulerConfig::default());
//! let price = engine.get_recommended_price("42").await?;
//! scheduler.stop().await;
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod store;
pub mod utils;

pub use error::{PricingError, Result};
pub use models::{Order, OrderStatus, PricingFactors, PricingRule, Product, Service, ServiceStatus};
pub use pricing::{
    EngineStatsSnapshot, EventCalendar, LocalEvent, PricingConfig, PricingEngine, RefreshScheduler,
    SchedulerConfig,
};
pub use store::{MemoryStore, PricingStore};
