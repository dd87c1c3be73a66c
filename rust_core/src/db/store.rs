//! `PricingStore` over the store's PostgreSQL schema.
//!
//! Expected tables:
//! - `services (id, name, category, price, status)`
//! - `orders (id, service_id, status, total_cost, created_at)`
//! - `products (id, name, category, stock_quantity, max_stock)`
//!
//! Ids are read as text so integer and UUID keyed schemas both work.
//!
//! The storefront's own schema has no `services.category` column and no
//! `products` table. Add both before pointing the engine at such a database,
//! otherwise every refresh fails with an unknown-column or unknown-table error:
//!
//! ```sql
//! ALTER TABLE services ADD COLUMN IF NOT EXISTS category TEXT;
//! CREATE TABLE IF NOT EXISTS products (
//!     id             SERIAL PRIMARY KEY,
//!     name           TEXT NOT NULL,
//!     category       TEXT,
//!     stock_quantity NUMERIC NOT NULL DEFAULT 0,
//!     max_stock      NUMERIC NOT NULL DEFAULT 0
//! );
//! ```
//!
//! A `NULL` category is read as an empty string, which matches no products
//! (inventory falls back to the configured default) and only calendar events
//! that apply to every category.

use crate::models::{Order, OrderStatus, Product, Service, ServiceStatus};
use crate::store::PricingStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

#[derive(Debug, FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    category: String,
    price: f64,
    status: String,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    service_id: String,
    status: String,
    total_cost: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    category: String,
    stock_quantity: f64,
    max_stock: f64,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        let status = row.status.parse::<ServiceStatus>().unwrap_or_else(|e| {
            warn!("Service {}: {}, treating as inactive", row.id, e);
            ServiceStatus::Inactive
        });
        Service {
            id: row.id,
            name: row.name,
            category: row.category,
            base_price: row.price,
            status,
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = String;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| format!("order {}: {}", row.id, e))?;
        Ok(Order {
            id: row.id,
            service_id: row.service_id,
            status,
            total_cost: row.total_cost,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PgPricingStore {
    pool: PgPool,
}

impl PgPricingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingStore for PgPricingStore {
    async fn get_services(&self) -> Result<Vec<Service>> {
        let rows: Vec<ServiceRow> = sqlx::query_as(
            r#"
            SELECT id::text AS id,
                   name,
                   COALESCE(category, '') AS category,
                   price::float8 AS price,
                   status::text AS status
            FROM services
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch services")?;

        debug!("Fetched {} services", rows.len());
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn get_orders(&self, since: DateTime<Utc>) -> Result<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id::text AS id,
                   service_id::text AS service_id,
                   status::text AS status,
                   total_cost::float8 AS total_cost,
                   created_at
            FROM orders
            WHERE created_at >= $1
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recent orders")?;

        let orders: Vec<Order> = rows
            .into_iter()
            .filter_map(|row| match Order::try_from(row) {
                Ok(order) => Some(order),
                Err(e) => {
                    warn!("Skipping {}", e);
                    None
                }
            })
            .collect();

        debug!("Fetched {} orders since {}", orders.len(), since);
        Ok(orders)
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id::text AS id,
                   name,
                   COALESCE(category, '') AS category,
                   COALESCE(stock_quantity, 0)::float8 AS stock_quantity,
                   COALESCE(max_stock, 0)::float8 AS max_stock
            FROM products
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch products")?;

        debug!("Fetched {} products", rows.len());
        Ok(rows
            .into_iter()
            .map(|row| Product {
                id: row.id,
                name: row.name,
                category: row.category,
                stock_quantity: row.stock_quantity,
                max_stock: row.max_stock,
            })
            .collect())
    }

    fn store_name(&self) -> &str {
        "postgres"
    }
}
