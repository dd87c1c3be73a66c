//! PostgreSQL access for the pricing engine.
//!
//! - Pooled connections with env-driven settings
//! - Start-up and background health checks
//! - `PgPricingStore`: the `PricingStore` backed by the store database

pub mod health;
pub mod pool;
pub mod store;

pub use health::{check_pool_health, PoolHealthConfig, PoolHealthMonitor};
pub use pool::{create_pool, DbPoolConfig};
pub use store::PgPricingStore;
