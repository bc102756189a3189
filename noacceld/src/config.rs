use noacceld_common::{tracing, ConfigError, PropertySetting};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

/// Name of the configuration file looked up in the config directories
pub const CONFIG_FILE_NAME: &str = "no-acceld.json";

/// Environment variable holding an explicit configuration path
pub const CONFIG_PATH_ENV: &str = "CONFIG_FILE";

/// Program used when the config does not name one
pub const DEFAULT_TOOL: &str = "xinput";

/// Configuration file as written by the user
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    device: String,
    properties: BTreeMap<String, String>,
    interval: i64,
    #[serde(default)]
    log: bool,
    #[serde(default)]
    tool: Option<String>,
}

/// Validated daemon configuration, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Substring identifying the pointer device(s) to manage
    pub device: String,
    pub properties: BTreeMap<String, String>,
    pub interval: Duration,
    pub log: bool,
    pub tool: String,
}

impl DaemonConfig {
    /// Parse and validate configuration text
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.device.is_empty() {
            return Err(ConfigError::EmptyDevice);
        }
        if raw.properties.is_empty() {
            return Err(ConfigError::EmptyProperties);
        }
        if raw.interval <= 0 {
            return Err(ConfigError::InvalidInterval(raw.interval));
        }

        let tool = match raw.tool {
            Some(tool) if tool.is_empty() => return Err(ConfigError::EmptyTool),
            Some(tool) => tool,
            None => DEFAULT_TOOL.to_string(),
        };

        Ok(Self {
            device: raw.device,
            properties: raw.properties,
            interval: Duration::from_secs(raw.interval as u64),
            log: raw.log,
            tool,
        })
    }

    /// Configured properties in reconciliation order
    pub fn settings(&self) -> Vec<PropertySetting> {
        self.properties
            .iter()
            .map(|(name, value)| PropertySetting::new(name.as_str(), value.as_str()))
            .collect()
    }
}

/// Locates and loads the configuration file
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Resolve the configuration path from the process environment
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = resolve_config_path(
            env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
            env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            env::var_os("HOME").map(PathBuf::from),
        )?;
        Ok(Self { config_path })
    }

    /// Use an explicit configuration path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Read and validate the configuration file
    pub async fn load_config(&self) -> Result<DaemonConfig, ConfigError> {
        info!("Loading configuration from {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|source| ConfigError::Read {
                path: self.config_path.clone(),
                source,
            })?;

        let config = DaemonConfig::from_json(&content, &self.config_path)?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

/// Pick the configuration path.
///
/// Order: explicit path, `$XDG_CONFIG_HOME/no-acceld.json`,
/// `$HOME/.config/no-acceld.json` when it exists, then the legacy
/// `$HOME/no-acceld.json`. Empty variables count as unset.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let set = |p: &PathBuf| !p.as_os_str().is_empty();

    if let Some(path) = explicit.filter(set) {
        return Ok(path);
    }
    if let Some(dir) = xdg_config_home.filter(set) {
        return Ok(dir.join(CONFIG_FILE_NAME));
    }

    let home = home.filter(set).ok_or(ConfigError::NoLocation)?;
    let dot_config = home.join(".config").join(CONFIG_FILE_NAME);
    if dot_config.exists() {
        return Ok(dot_config);
    }
    Ok(home.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "device": "ACME Mouse",
        "properties": {
            "Accel Speed": "0.0",
            "Accel Profile Enabled": "0, 1"
        },
        "interval": 5,
        "log": true
    }"#;

    fn parse(content: &str) -> Result<DaemonConfig, ConfigError> {
        DaemonConfig::from_json(content, Path::new("test.json"))
    }

    #[test]
    fn test_valid_config() {
        let config = parse(VALID).unwrap();
        assert_eq!(config.device, "ACME Mouse");
        assert_eq!(config.interval, Duration::from_secs(5));
        assert!(config.log);
        assert_eq!(config.tool, "xinput");

        let names: Vec<String> = config.settings().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Accel Profile Enabled", "Accel Speed"]);
    }

    #[test]
    fn test_log_defaults_to_false() {
        let config =
            parse(r#"{"device": "M", "properties": {"Accel Speed": "0"}, "interval": 1}"#).unwrap();
        assert!(!config.log);
    }

    #[test]
    fn test_empty_device_rejected() {
        let err = parse(r#"{"device": "", "properties": {"a": "b"}, "interval": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDevice));
    }

    #[test]
    fn test_empty_properties_rejected() {
        let err = parse(r#"{"device": "M", "properties": {}, "interval": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyProperties));
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        for interval in ["0", "-5"] {
            let content = format!(
                r#"{{"device": "M", "properties": {{"a": "b"}}, "interval": {}}}"#,
                interval
            );
            let err = parse(&content).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidInterval(_)));
        }
    }

    #[test]
    fn test_missing_field_and_bad_json_rejected() {
        assert!(matches!(
            parse(r#"{"device": "M", "interval": 1}"#),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(parse("not json"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            parse(r#"{"device": "M", "properties": {"a": "b"}, "interval": 1, "intervall": 2}"#),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_tool_rejected() {
        let err = parse(r#"{"device": "M", "properties": {"a": "b"}, "interval": 1, "tool": ""}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTool));
    }

    #[test]
    fn test_resolve_prefers_explicit_then_xdg() {
        let explicit = resolve_config_path(
            Some(PathBuf::from("/etc/custom.json")),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/user")),
        )
        .unwrap();
        assert_eq!(explicit, PathBuf::from("/etc/custom.json"));

        let xdg = resolve_config_path(
            Some(PathBuf::new()),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/user")),
        )
        .unwrap();
        assert_eq!(xdg, PathBuf::from("/xdg/no-acceld.json"));
    }

    #[test]
    fn test_resolve_home_locations() {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().to_path_buf();

        let legacy = resolve_config_path(None, None, Some(home.clone())).unwrap();
        assert_eq!(legacy, home.join("no-acceld.json"));

        std::fs::create_dir_all(home.join(".config")).unwrap();
        std::fs::write(home.join(".config/no-acceld.json"), VALID).unwrap();
        let dot_config = resolve_config_path(None, None, Some(home.clone())).unwrap();
        assert_eq!(dot_config, home.join(".config/no-acceld.json"));

        assert!(matches!(
            resolve_config_path(None, None, None),
            Err(ConfigError::NoLocation)
        ));
    }

    #[tokio::test]
    async fn test_load_config_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("no-acceld.json");
        std::fs::write(&config_path, VALID).unwrap();

        let manager = ConfigManager::with_path(&config_path);
        let config = manager.load_config().await.unwrap();
        assert_eq!(config.properties.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("absent.json"));
        assert!(matches!(
            manager.load_config().await,
            Err(ConfigError::Read { .. })
        ));
    }
}
