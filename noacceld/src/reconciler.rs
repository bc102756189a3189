use noacceld_common::{tracing, xinput, MatchedDevice, PropertySetting, ToolError};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::tool::DeviceTool;

/// What happened to one property on one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The device does not report the property
    Unsupported,
    /// Empty name or value
    Skipped,
}

/// Summary of a reconciliation cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub devices: usize,
    pub applied: usize,
    pub unsupported: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The device listing itself failed and nothing was attempted
    pub listing_failed: bool,
}

impl CycleReport {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Unsupported => self.unsupported += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.listing_failed {
            return write!(f, "device listing failed");
        }
        write!(
            f,
            "{} device(s), {} applied, {} unsupported, {} skipped, {} failed",
            self.devices, self.applied, self.unsupported, self.skipped, self.failed
        )
    }
}

/// Applies the configured properties to matched devices.
///
/// Holds no state between calls, so running it twice issues the same
/// invocations twice.
pub struct PropertyReconciler {
    tool: Arc<dyn DeviceTool>,
    settings: Vec<PropertySetting>,
}

impl PropertyReconciler {
    pub fn new(tool: Arc<dyn DeviceTool>, settings: Vec<PropertySetting>) -> Self {
        Self { tool, settings }
    }

    pub fn settings(&self) -> &[PropertySetting] {
        &self.settings
    }

    /// Apply a single property to a single device
    pub async fn reconcile(
        &self,
        device: &MatchedDevice,
        setting: &PropertySetting,
    ) -> Result<Outcome, ToolError> {
        if setting.is_blank() {
            debug!("Skipping blank property setting on {}", device);
            return Ok(Outcome::Skipped);
        }

        let listing = self.tool.list_props(device.id).await?;
        let qualified = setting.qualified_name();

        if !xinput::supports_property(&listing, &qualified) {
            debug!("{} does not support \"{}\"", device, qualified);
            return Ok(Outcome::Unsupported);
        }

        let values = setting.value_args();
        self.tool.set_prop(device.id, &qualified, &values).await?;
        info!("Set {} on {}", setting, device);
        Ok(Outcome::Applied)
    }

    /// Apply every configured property to every device, containing failures
    pub async fn reconcile_all(&self, devices: &[MatchedDevice]) -> CycleReport {
        let mut report = CycleReport {
            devices: devices.len(),
            ..CycleReport::default()
        };

        for device in devices {
            for setting in &self.settings {
                match self.reconcile(device, setting).await {
                    Ok(outcome) => report.record(outcome),
                    Err(e) => {
                        warn!("Failed to set \"{}\" on {}: {}", setting.qualified_name(), device, e);
                        report.failed += 1;
                    }
                }
            }
        }

        report
    }
}
