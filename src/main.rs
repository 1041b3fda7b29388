//! Heartbeat monitor
//!
//! Keeps a heart icon in sync with the liveness of a backend API.
//!
//! # Architecture Overview
//!
//! ```text
//!     ┌──────────┐  tick   ┌─────────┐  GET   ┌──────────────┐
//!     │  ticker  │────────▶│  probe  │───────▶│   endpoint   │
//!     └──────────┘         └────┬────┘        └──────────────┘
//!                               │ Alive / Down
//!                               ▼
//!                         ┌───────────┐       ┌──────────────┐
//!                         │ indicator │──────▶│ page (heart) │──▶ console
//!                         └───────────┘       └──────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use heartbeat_monitor::config::validation::validate_config;
use heartbeat_monitor::config::{load_config, ConfigError, MonitorConfig};
use heartbeat_monitor::health::HealthState;
use heartbeat_monitor::lifecycle::{wait_for_signal, Runtime};
use heartbeat_monitor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "heartbeat-monitor")]
#[command(about = "Poll a heartbeat endpoint and show whether it is alive", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Heartbeat endpoint, as the host page would supply it.
    #[arg(short, long)]
    url: Option<String>,

    /// Override the polling interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Probe once and exit with 0 if alive, 1 if down.
    #[arg(long)]
    once: bool,
}

fn load(cli: &Cli) -> Result<MonitorConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };

    if let Some(interval_ms) = cli.interval_ms {
        config.monitor.interval_ms = interval_ms;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

fn render(state: HealthState, classes: Option<&str>) {
    let heart = match state {
        HealthState::Alive => "\x1b[32m♥\x1b[0m",
        HealthState::Down => "\x1b[31m♡\x1b[0m",
    };
    match classes {
        Some(classes) => println!("{} {:<5} [{}]", heart, state, classes),
        None => println!("{} {:<5}", heart, state),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("heartbeat-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = Runtime::from_config(&config, cli.url.as_deref())?;

    if cli.once {
        let state = runtime.monitor.check_once().await;
        render(state, runtime.indicator_classes().as_deref());
        return Ok(ExitCode::from(state.exit_status()));
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut states = runtime.monitor.subscribe();
    let handle = runtime.monitor.start(runtime.interval);
    let signal = wait_for_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                if let Some(state) = state {
                    render(state, runtime.indicator_classes().as_deref());
                }
            }
            _ = &mut signal => break,
        }
    }

    handle.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
