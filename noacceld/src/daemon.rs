//! Poll loop and shutdown handling
//!
//! The worker runs one reconciliation cycle, then waits for the configured
//! interval or a shutdown request, whichever comes first. A cycle that has
//! started always runs to completion; shutdown is only observed between
//! cycles.

use noacceld_common::tracing;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::DaemonConfig;
use crate::device::DeviceManager;
use crate::reconciler::{CycleReport, PropertyReconciler};
use crate::tool::{DeviceTool, XinputTool};

/// Create a connected shutdown trigger and listener
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Requests shutdown of every associated [`Shutdown`] listener
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // Listeners may already be gone
        let _ = self.tx.send(true);
    }
}

/// Observes a shutdown request. Dropping the trigger counts as a request.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// The reconciliation daemon: enumerate, match, apply, wait
pub struct Daemon {
    config: DaemonConfig,
    devices: DeviceManager,
    reconciler: PropertyReconciler,
}

impl Daemon {
    /// Create a daemon driving the configured `xinput` executable
    pub fn new(config: DaemonConfig) -> Self {
        let tool = Arc::new(XinputTool::with_program(config.tool.as_str()));
        Self::with_tool(config, tool)
    }

    /// Create a daemon driving an arbitrary device tool
    pub fn with_tool(config: DaemonConfig, tool: Arc<dyn DeviceTool>) -> Self {
        let devices = DeviceManager::new(Arc::clone(&tool), config.device.as_str());
        let reconciler = PropertyReconciler::new(tool, config.settings());
        Self {
            config,
            devices,
            reconciler,
        }
    }

    /// Run one reconciliation cycle.
    ///
    /// A failed device listing skips the cycle; the next one runs at the
    /// following interval.
    pub async fn run_cycle(&self) -> CycleReport {
        let devices = match self.devices.scan().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Skipping cycle, device listing failed: {}", e);
                return CycleReport {
                    listing_failed: true,
                    ..CycleReport::default()
                };
            }
        };

        let report = self.reconciler.reconcile_all(&devices).await;
        debug!("Cycle finished: {}", report);
        report
    }

    /// Poll until shutdown is requested. Returns the number of cycles run.
    pub async fn run(&self, mut shutdown: Shutdown) -> usize {
        self.log_startup();

        let mut cycles = 0;
        loop {
            if shutdown.is_shutdown() {
                break;
            }

            self.run_cycle().await;
            cycles += 1;

            tokio::select! {
                _ = sleep(self.config.interval) => {}
                _ = shutdown.wait() => {
                    debug!("Shutdown requested while waiting for the next cycle");
                }
            }
        }

        info!("Goodbye! ({} cycles)", cycles);
        cycles
    }

    fn log_startup(&self) {
        info!(
            "Starting with device \"{}\", interval {} seconds",
            self.config.device,
            self.config.interval.as_secs()
        );
        for setting in self.reconciler.settings() {
            info!("  {}", setting);
        }
    }
}
