//! no-acceld Daemon Library
//!
//! Keeps libinput pointer properties applied by driving `xinput`:
//! - Configuration discovery and validation
//! - Device enumeration and matching
//! - Property reconciliation
//! - The poll loop and its shutdown handling

pub mod config;
pub mod daemon;
pub mod device;
pub mod reconciler;
pub mod tool;

// Re-export common types
pub use noacceld_common::{ConfigError, DeviceRecord, MatchedDevice, PropertySetting, ToolError};

pub use config::{ConfigManager, DaemonConfig};
pub use daemon::{shutdown_channel, Daemon, Shutdown, ShutdownTrigger};
pub use reconciler::{CycleReport, Outcome, PropertyReconciler};
pub use tool::{DeviceTool, XinputTool};
