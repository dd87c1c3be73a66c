//! PricingService: wires the Postgres store, the pricing engine and the
//! refresh scheduler into one long-running process.

use crate::config::PricingServiceConfig;
use anyhow::{Context, Result};
use laundry_pricing_core::db::{check_pool_health, create_pool, PgPricingStore, PoolHealthMonitor};
use laundry_pricing_core::{EventCalendar, PricingEngine, PricingStore, RefreshScheduler};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PricingService {
    pub config: PricingServiceConfig,
    pub engine: Arc<PricingEngine>,
    health_monitor: Option<PoolHealthMonitor>,
}

/// Calendar from the configured file, or an empty one.
pub fn load_calendar(config: &PricingServiceConfig) -> Result<EventCalendar> {
    match &config.events_file {
        Some(path) => EventCalendar::load(path)
            .with_context(|| format!("Failed to load PRICING_EVENTS_FILE {}", path.display())),
        None => {
            info!("No PRICING_EVENTS_FILE set, local events factor stays at 0");
            Ok(EventCalendar::empty())
        }
    }
}

impl PricingService {
    pub async fn new(config: PricingServiceConfig) -> Result<Self> {
        info!("Initializing PricingService {}", config.service_id);

        let pool = create_pool(&config.database_url, &config.db_pool).await?;
        check_pool_health(&pool).await?;
        info!("Connected to database");

        let calendar = load_calendar(&config)?;
        let store: Arc<dyn PricingStore> = Arc::new(PgPricingStore::new(pool.clone()));
        let engine = Arc::new(PricingEngine::new(store, &config.pricing, calendar)?);
        let health_monitor = Some(PoolHealthMonitor::new(pool, config.db_health.clone()));

        Ok(Self {
            config,
            engine,
            health_monitor,
        })
    }

    /// Build around an existing engine (no database health monitoring).
    pub fn with_engine(config: PricingServiceConfig, engine: Arc<PricingEngine>) -> Self {
        Self {
            config,
            engine,
            health_monitor: None,
        }
    }

    /// Seed rules, run the scheduler until `shutdown` resolves, then stop it.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        // A store outage at start-up is not fatal: the scheduler keeps retrying
        // every interval and quotes fall back to base prices meanwhile.
        match self.engine.initialize().await {
            Ok(seeded) => info!("[{}] Seeded {} services", self.config.service_id, seeded),
            Err(e) => warn!("[{}] Initial seeding failed: {}", self.config.service_id, e),
        }

        let health_task = self.health_monitor.take().and_then(|m| m.spawn());
        let mut scheduler = RefreshScheduler::start(self.engine.clone(), self.config.scheduler());

        info!(
            "PricingService {} running (refresh every {}s)",
            self.config.service_id,
            self.config.pricing.refresh_interval.as_secs()
        );

        shutdown.await;

        info!("[{}] Shutting down", self.config.service_id);
        scheduler.stop().await;
        if let Some(task) = health_task {
            task.abort();
        }

        let stats = self.engine.stats();
        info!(
            "[{}] Final stats: cycles={}, failed={}, services_priced={}",
            self.config.service_id, stats.cycles_run, stats.cycles_failed, stats.services_priced
        );
        Ok(())
    }

    /// Run until Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
