// Maintenance Service
// Periodic purge of expired transients

use crate::application::shutdown::ShutdownToken;
use crate::error::Result;
use crate::port::TransientStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Maintenance scheduler
///
/// Expiry is already enforced on every read; purging only reclaims storage.
pub struct MaintenanceScheduler {
    transients: Arc<dyn TransientStore>,
    every: Duration,
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler
    ///
    /// # Arguments
    /// * `transients` - Store to purge
    /// * `every` - Delay between purges
    pub fn new(transients: Arc<dyn TransientStore>, every: Duration) -> Self {
        Self { transients, every }
    }

    /// Run maintenance loop until shutdown (spawn with tokio::spawn)
    pub async fn run(self, mut shutdown: ShutdownToken) {
        // The first tick is immediate; a stopped daemon must not purge
        if shutdown.is_shutdown() {
            info!("Maintenance scheduler not started, shutdown already requested");
            return;
        }

        info!(
            interval_secs = self.every.as_secs(),
            "Maintenance scheduler started"
        );

        let mut tick = interval(self.every);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.run_now().await {
                        error!(error = ?e, "Scheduled purge failed");
                    }
                }
                _ = shutdown.wait() => {
                    info!("Maintenance scheduler stopped");
                    return;
                }
            }
        }
    }

    /// Purge immediately (manual trigger)
    pub async fn run_now(&self) -> Result<u64> {
        let purged = self.transients.purge_expired().await?;
        info!(purged = purged, "Expired transients purged");
        Ok(purged)
    }
}
