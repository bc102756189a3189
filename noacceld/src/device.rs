use noacceld_common::{tracing, xinput, DeviceRecord, MatchedDevice, ToolError};
use std::sync::Arc;
use tracing::{debug, info};

use crate::tool::DeviceTool;

/// Finds the pointer devices a cycle should reconcile
pub struct DeviceManager {
    tool: Arc<dyn DeviceTool>,
    device: String,
}

impl DeviceManager {
    /// Create a device manager matching pointers whose listing contains `device`
    pub fn new(tool: Arc<dyn DeviceTool>, device: impl Into<String>) -> Self {
        Self {
            tool,
            device: device.into(),
        }
    }

    /// Enumerate all input devices
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, ToolError> {
        let records = self.tool.list_devices().await?;
        debug!("Listing returned {} lines", records.len());
        for record in &records {
            debug!("  {}", record);
        }
        Ok(records)
    }

    /// Keep the pointer records naming the configured device
    pub fn match_devices(&self, records: &[DeviceRecord]) -> Vec<MatchedDevice> {
        let matched = xinput::match_devices(records, &self.device);
        for device in &matched {
            debug!("Matched {} (id={})", device, device.raw_id);
        }
        matched
    }

    /// Enumerate and match in one step
    pub async fn scan(&self) -> Result<Vec<MatchedDevice>, ToolError> {
        let records = self.list_devices().await?;
        let matched = self.match_devices(&records);
        if matched.is_empty() {
            info!("No pointer device matching \"{}\" found", self.device);
        }
        Ok(matched)
    }
}
