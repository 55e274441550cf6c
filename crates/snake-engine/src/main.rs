//! Headless host for the Snake simulation.
//!
//! Wires the simulation core to a line-based control surface on stdin and
//! a frame log on the tracing output. It loads configuration, starts the
//! tick task, and waits until the run ends.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$SNAKE_CONFIG` (default `snake-config.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Start the simulation
//! 4. Spawn the frame logger
//! 5. Spawn the stdin command reader and the Ctrl-C handler
//! 6. Wait for `quit`, Ctrl-C, or the tick limit
//! 7. Log the result

mod error;
mod frame_log;
mod input;

use std::path::PathBuf;

use snake_core::Simulation;
use snake_core::config::{LogFormat, LoggingConfig, SnakeConfig};
use snake_core::control::Controls;
use snake_core::runner;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming the config file.
const ENV_CONFIG_PATH: &str = "SNAKE_CONFIG";

/// Config file used when `SNAKE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "snake-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the simulation
/// task fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so the outcome is
    //    reported once it is.
    let (config, config_path, found) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);

    info!("snake-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        board_size = config.game.board_size,
        tick_interval_ms = config.game.tick_interval_ms,
        initial_length_target = config.game.initial_length_target,
        seed = ?config.game.seed,
        max_ticks = config.simulation.max_ticks,
        "Game configuration"
    );

    // 3. Start the simulation.
    let sim = Simulation::start(&config.game, &config.simulation)?;
    let controls = sim.controls();

    // 4. Log every published frame.
    let frame_logger = frame_log::spawn_frame_logger(sim.subscribe());

    // 5. Input surfaces. The reader thread is detached; it dies with the
    //    process.
    let _reader = input::spawn_stdin_reader(controls.clone())?;
    spawn_ctrl_c_handler(controls);
    info!("Commands: up|down|left|right (w|s|a|d), pause, resume, speed <ms>, quit");

    // 6. Run until something stops the simulation.
    let result = sim.join().await?;

    // 7. Log results.
    runner::log_simulation_end(&result);
    match frame_logger.await {
        Ok(frames) => info!(frames_logged = frames, "Frame logger finished"),
        Err(e) => warn!(error = %e, "Frame logger task failed"),
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "snake-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `$SNAKE_CONFIG` or `snake-config.yaml`.
///
/// A missing file yields the defaults (environment overrides still apply).
/// Returns the config, the path that was tried, and whether it existed.
fn load_config() -> Result<(SnakeConfig, PathBuf, bool), EngineError> {
    let config_path = std::env::var_os(ENV_CONFIG_PATH)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if config_path.exists() {
        let config = SnakeConfig::from_file(&config_path)?;
        Ok((config, config_path, true))
    } else {
        let config = SnakeConfig::from_env()?;
        Ok((config, config_path, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Request a stop on the first Ctrl-C.
fn spawn_ctrl_c_handler(controls: Controls) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping");
                controls.request_stop();
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });
}
