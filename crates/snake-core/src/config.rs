//! Configuration loading and typed config structures for the Snake simulation.
//!
//! The canonical configuration lives in `snake-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use snake_types::{BOARD_SIZE, Cell, Direction};

use crate::operator::MIN_TICK_INTERVAL_MS;

/// Largest accepted board side length.
pub const MAX_BOARD_SIZE: u32 = 1024;

/// Environment variable overriding `game.tick_interval_ms`.
pub const ENV_TICK_INTERVAL_MS: &str = "SNAKE_TICK_INTERVAL_MS";

/// Environment variable overriding `game.seed`.
pub const ENV_SEED: &str = "SNAKE_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible game.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `snake-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnakeConfig {
    /// Board and timing settings.
    #[serde(default)]
    pub game: GameConfig,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SnakeConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SNAKE_TICK_INTERVAL_MS` overrides `game.tick_interval_ms`
    /// - `SNAKE_SEED` overrides `game.seed`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::deserialize_yaml(&contents)?;
        config.game.apply_env_overrides();
        config.game.validate()?;
        Ok(config)
    }

    /// Built-in defaults with environment overrides applied, for when no
    /// config file exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.game.apply_env_overrides();
        config.game.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string. The process
    /// environment is not consulted.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config = Self::deserialize_yaml(yaml)?;
        config.game.validate()?;
        Ok(config)
    }

    fn deserialize_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Board, timing, and initial-state configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Side length of the square, toroidal board.
    #[serde(default = "default_board_size")]
    pub board_size: u32,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Food position before the first tick.
    #[serde(default = "default_initial_food")]
    pub initial_food: Cell,

    /// Snake body before the first tick, head first.
    #[serde(default = "default_initial_snake")]
    pub initial_snake: Vec<Cell>,

    /// Length target at start and after every self-collision.
    #[serde(default = "default_initial_length_target")]
    pub initial_length_target: usize,

    /// Heading before any input arrives.
    #[serde(default)]
    pub initial_direction: Direction,

    /// Seed for food placement. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            tick_interval_ms: default_tick_interval_ms(),
            initial_food: default_initial_food(),
            initial_snake: default_initial_snake(),
            initial_length_target: default_initial_length_target(),
            initial_direction: Direction::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Apply environment variable overrides. Unparseable values are
    /// ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(ENV_TICK_INTERVAL_MS) {
            match raw.trim().parse() {
                Ok(ms) => self.tick_interval_ms = ms,
                Err(e) => {
                    tracing::warn!(var = ENV_TICK_INTERVAL_MS, value = %raw, error = %e, "ignoring override");
                }
            }
        }
        if let Ok(raw) = std::env::var(ENV_SEED) {
            match raw.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(e) => {
                    tracing::warn!(var = ENV_SEED, value = %raw, error = %e, "ignoring override");
                }
            }
        }
    }

    /// Check that the configuration describes a playable board.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the board size is zero or above
    /// [`MAX_BOARD_SIZE`], the tick interval is below
    /// [`MIN_TICK_INTERVAL_MS`], the initial snake is empty, any initial
    /// cell is off the board, or the length target is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}, got {}",
                    self.tick_interval_ms
                ),
            });
        }
        check_board(
            self.board_size,
            self.initial_food,
            &self.initial_snake,
            self.initial_length_target,
        )
    }
}

/// Check a board size, food cell, body, and length target for a playable
/// game.
pub(crate) fn check_board(
    board_size: u32,
    food: Cell,
    snake: &[Cell],
    length_target: usize,
) -> Result<(), ConfigError> {
    let invalid =
        |reason: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid { reason }) };

    if board_size == 0 || board_size > MAX_BOARD_SIZE {
        return invalid(format!(
            "board_size must be in 1..={MAX_BOARD_SIZE}, got {board_size}"
        ));
    }
    if length_target == 0 {
        return invalid("initial_length_target must be at least 1".to_owned());
    }
    if snake.is_empty() {
        return invalid("initial_snake must contain at least one cell".to_owned());
    }
    if !food.in_bounds(board_size) {
        return invalid(format!(
            "initial_food {food:?} is outside a {board_size}x{board_size} board"
        ));
    }
    if let Some(cell) = snake.iter().find(|c| !c.in_bounds(board_size)) {
        return invalid(format!(
            "initial_snake cell {cell:?} is outside a {board_size}x{board_size} board"
        ));
    }
    Ok(())
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = run until stopped).
    #[serde(default)]
    pub max_ticks: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for log lines.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

const fn default_board_size() -> u32 {
    BOARD_SIZE
}

const fn default_tick_interval_ms() -> u64 {
    200
}

const fn default_initial_food() -> Cell {
    Cell::new(5, 5)
}

fn default_initial_snake() -> Vec<Cell> {
    vec![Cell::new(7, 7)]
}

const fn default_initial_length_target() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_owned()
}
