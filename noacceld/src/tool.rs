use noacceld_common::{tracing, xinput, DeviceRecord, ToolError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Trait for the external tool that lists devices and sets their properties
#[async_trait::async_trait]
pub trait DeviceTool: Send + Sync {
    /// List all input devices, one record per line
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, ToolError>;
    /// Property listing of a single device
    async fn list_props(&self, id: u32) -> Result<String, ToolError>;
    /// Set a property to one or more value arguments
    async fn set_prop(&self, id: u32, name: &str, values: &[String]) -> Result<(), ToolError>;
}

/// `xinput` run as a subprocess.
///
/// Invocations have no timeout: a hung `xinput` blocks the caller until it
/// exits.
#[derive(Debug, Clone)]
pub struct XinputTool {
    program: String,
}

impl XinputTool {
    pub fn new() -> Self {
        Self::with_program("xinput")
    }

    /// Use a different executable speaking the same protocol
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the tool and return stdout followed by stderr
    async fn run(&self, args: &[String]) -> Result<String, ToolError> {
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ToolError::Failed {
                program: self.program.clone(),
                args: args.join(" "),
                status: output.status,
                output: combined.trim().to_string(),
            });
        }

        Ok(combined)
    }
}

impl Default for XinputTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DeviceTool for XinputTool {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, ToolError> {
        let args = vec![xinput::LIST_FLAG.to_string()];
        let output = self.run(&args).await?;

        if output.trim().is_empty() {
            return Err(ToolError::EmptyOutput {
                program: self.program.clone(),
                args: args.join(" "),
            });
        }

        Ok(xinput::parse_records(&output))
    }

    async fn list_props(&self, id: u32) -> Result<String, ToolError> {
        self.run(&xinput::list_props_args(id)).await
    }

    async fn set_prop(&self, id: u32, name: &str, values: &[String]) -> Result<(), ToolError> {
        self.run(&xinput::set_prop_args(id, name, values)).await?;
        Ok(())
    }
}
