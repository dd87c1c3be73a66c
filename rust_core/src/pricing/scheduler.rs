//! Fixed-interval refresh of all pricing rules.

use crate::pricing::engine::PricingEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// Log engine stats every N cycles (0 disables)
    pub stats_log_every: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300), // 5 minutes
            stats_log_every: 12,
        }
    }
}

/// Handle to the background refresh task.
///
/// The first cycle runs immediately. Cycles never overlap: the task awaits
/// each refresh before waiting for the next tick, and ticks missed during a
/// slow refresh are delayed rather than replayed. Dropping the handle stops
/// the task at its next wake-up.
pub struct RefreshScheduler {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn start(engine: Arc<PricingEngine>, config: SchedulerConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(Self::refresh_loop(engine, config, shutdown_rx));

        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    async fn refresh_loop(
        engine: Arc<PricingEngine>,
        config: SchedulerConfig,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        info!(
            "Pricing refresh scheduler started (interval: {}s)",
            config.interval.as_secs()
        );

        let mut ticker = interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0u64;

        loop {
            tokio::select! {
                biased;

                // Fires on explicit stop and when the handle is dropped
                _ = &mut shutdown_rx => break,

                _ = ticker.tick() => {
                    engine.run_cycle().await;
                    cycles += 1;

                    if config.stats_log_every > 0 && cycles % config.stats_log_every == 0 {
                        let s = engine.stats();
                        info!(
                            "Pricing stats: cycles={}, failed={}, services_priced={}, \
                             tracked={}, last_success={:?}",
                            s.cycles_run,
                            s.cycles_failed,
                            s.services_priced,
                            engine.tracked_services(),
                            s.last_success
                        );
                    }
                }
            }
        }

        info!("Pricing refresh scheduler stopped after {} cycles", cycles);
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer and wait for the task to exit. An in-flight refresh is
    /// allowed to finish. Calling `stop` again is a no-op.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}
