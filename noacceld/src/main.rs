//! no-acceld - Main Entry Point
//!
//! Loads the configuration, then reapplies the configured libinput
//! properties every interval until SIGTERM or SIGINT arrives.

use noacceld::{shutdown_channel, ConfigManager, Daemon, DaemonConfig};
use noacceld_common::tracing;
use std::env;
use tracing::{error, info, Level};

const USAGE: &str = "\
Usage: no-acceld [--once | --check-config | --help]

  --once           apply the configured properties once and exit
  --check-config   validate the configuration file and exit
  --help           show this message

The configuration is read from $CONFIG_FILE, $XDG_CONFIG_HOME/no-acceld.json,
~/.config/no-acceld.json or ~/no-acceld.json, in that order.";

/// What the process was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Once,
    CheckConfig,
    Help,
}

fn parse_args(args: &[String]) -> Result<Mode, String> {
    match args {
        [] => Ok(Mode::Run),
        [flag] => match flag.as_str() {
            "--once" => Ok(Mode::Once),
            "--check-config" => Ok(Mode::CheckConfig),
            "--help" | "-h" => Ok(Mode::Help),
            other => Err(format!("unknown argument: {}", other)),
        },
        _ => Err("expected at most one argument".to_string()),
    }
}

/// Log level for the configured `log` switch
fn log_level(log: bool) -> Level {
    if env::var_os("NOACCELD_DEBUG").is_some() {
        Level::DEBUG
    } else if log {
        Level::INFO
    } else {
        Level::ERROR
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

async fn load_config() -> Result<DaemonConfig, Box<dyn std::error::Error>> {
    let manager = ConfigManager::new()?;
    Ok(manager.load_config().await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mode = match parse_args(&args) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("no-acceld: {}\n\n{}", e, USAGE);
            return Err(e.into());
        }
    };

    if mode == Mode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    // Logging depends on the config, so a failed load is reported at the
    // only level that is always enabled
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            init_logging(log_level(false));
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    init_logging(log_level(config.log));

    match mode {
        Mode::CheckConfig => {
            println!(
                "Configuration OK: device \"{}\", {} properties, interval {} seconds",
                config.device,
                config.properties.len(),
                config.interval.as_secs()
            );
            Ok(())
        }
        Mode::Once => {
            let daemon = Daemon::new(config);
            let report = daemon.run_cycle().await;
            println!("{}", report);
            Ok(())
        }
        Mode::Run | Mode::Help => run(config).await,
    }
}

async fn run(config: DaemonConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Register handlers before the worker starts so no signal is missed
    let mut signals = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut interrupt = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    let (trigger, shutdown) = shutdown_channel();
    let daemon = Daemon::new(config);
    let worker = tokio::spawn(async move { daemon.run(shutdown).await });

    // Wait for shutdown signal
    tokio::select! {
        _ = signals.recv() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
        _ = interrupt.recv() => {
            info!("Received SIGINT, shutting down gracefully");
        }
    }

    trigger.trigger();
    worker.await?;
    info!("no-acceld shutdown complete");
    Ok(())
}
