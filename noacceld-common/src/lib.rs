use std::fmt;

// Re-export common dependencies
pub use tracing;

pub mod error;
pub mod xinput;

pub use error::{ConfigError, ToolError};

/// Namespace prefix the libinput driver puts in front of its tunables
pub const PROPERTY_NAMESPACE: &str = "libinput ";

/// A single line of `xinput --list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub line: String,
}

impl DeviceRecord {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.line.trim())
    }
}

/// A pointer device selected for reconciliation during one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedDevice {
    pub id: u32,
    /// The `id=` token exactly as it appeared in the listing
    pub raw_id: String,
}

impl fmt::Display for MatchedDevice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "device {}", self.id)
    }
}

/// A driver property and the value that should be kept applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySetting {
    pub name: String,
    pub value: String,
}

impl PropertySetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Property name as reported by `xinput --list-props`
    pub fn qualified_name(&self) -> String {
        format!("{}{}", PROPERTY_NAMESPACE, self.name)
    }

    /// Whether either half is empty; such settings are never applied
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() || self.value.is_empty()
    }

    /// Value arguments for `xinput --set-prop`
    pub fn value_args(&self) -> Vec<String> {
        xinput::split_value(&self.value)
    }
}

impl fmt::Display for PropertySetting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" = {}", self.qualified_name(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let setting = PropertySetting::new("Accel Speed", "0.0");
        assert_eq!(setting.qualified_name(), "libinput Accel Speed");
        assert_eq!(setting.to_string(), "\"libinput Accel Speed\" = 0.0");
    }

    #[test]
    fn test_blank_settings() {
        assert!(PropertySetting::new("", "1").is_blank());
        assert!(PropertySetting::new("Accel Speed", "").is_blank());
        assert!(!PropertySetting::new("Accel Speed", "0").is_blank());
    }

    #[test]
    fn test_value_args_delegates_to_split() {
        let setting = PropertySetting::new("Accel Profile Enabled", "0, 1");
        assert_eq!(setting.value_args(), vec!["0,".to_string(), "1".to_string()]);
    }
}
