//! Error types shared by the daemon and its tests

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while locating, reading or validating the configuration file.
///
/// All of these are fatal: the daemon refuses to start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot locate config file: neither CONFIG_FILE, XDG_CONFIG_HOME nor HOME is set")]
    NoLocation,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config: `device` must not be empty")]
    EmptyDevice,

    #[error("invalid config: `properties` must contain at least one entry")]
    EmptyProperties,

    #[error("invalid config: `interval` must be a positive number of seconds, got {0}")]
    InvalidInterval(i64),

    #[error("invalid config: `tool` must not be empty")]
    EmptyTool,
}

/// Errors raised by an invocation of the external device tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} {args} exited with {status}: {output}")]
    Failed {
        program: String,
        args: String,
        status: ExitStatus,
        output: String,
    },

    #[error("{program} {args} produced no output")]
    EmptyOutput { program: String, args: String },
}
