//! Line-oriented command input.
//!
//! Each line on stdin is one command:
//!
//! | Line                              | Effect                          |
//! |-----------------------------------|---------------------------------|
//! | `up`, `down`, `left`, `right`     | Change heading                  |
//! | `w`, `s`, `a`, `d`                | Change heading                  |
//! | `pause` / `resume`                | Hold or restart ticking         |
//! | `speed <ms>`                      | Set the tick interval           |
//! | `quit`                            | Stop the simulation             |
//!
//! The reader runs on a detached OS thread: a blocking stdin read cannot
//! be cancelled, and the thread must not hold up runtime shutdown.

use std::io::BufRead;
use std::str::FromStr;
use std::thread::{self, JoinHandle};

use snake_core::control::Controls;
use snake_types::Direction;
use tracing::{debug, info, warn};

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Change the heading.
    Turn(Direction),
    /// Pause ticking.
    Pause,
    /// Resume ticking.
    Resume,
    /// Set the tick interval in milliseconds.
    Speed(u64),
    /// Stop the simulation.
    Quit,
}

/// Errors from parsing an input line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a known command.
    #[error("unknown command: {input}")]
    Unknown {
        /// The unrecognized word.
        input: String,
    },

    /// `speed` was given no value or a value that is not a number.
    #[error("speed needs a millisecond value, got {value:?}")]
    InvalidSpeed {
        /// The argument as typed, if any.
        value: Option<String>,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };

        match head.to_lowercase().as_str() {
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "quit" | "q" => Ok(Self::Quit),
            "speed" => {
                let arg = words.next();
                arg.and_then(|raw| raw.parse::<u64>().ok())
                    .map(Self::Speed)
                    .ok_or_else(|| CommandError::InvalidSpeed {
                        value: arg.map(str::to_owned),
                    })
            }
            word => Direction::from_str(word)
                .map(Self::Turn)
                .map_err(|_unknown| CommandError::Unknown {
                    input: word.to_owned(),
                }),
        }
    }
}

impl Command {
    /// Apply the command to the running simulation.
    ///
    /// Returns `false` once the command asks the reader to stop.
    pub fn apply(self, controls: &Controls) -> bool {
        match self {
            Self::Turn(direction) => controls.set_direction(direction),
            Self::Pause => {
                controls.pause();
                info!("Pause requested");
            }
            Self::Resume => {
                controls.resume();
                info!("Resume requested");
            }
            Self::Speed(ms) => match controls.operator().set_tick_interval_ms(ms) {
                Some(previous_ms) => {
                    info!(previous_ms, tick_interval_ms = ms, "Tick interval changed");
                }
                None => warn!(
                    requested_ms = ms,
                    min_ms = snake_core::operator::MIN_TICK_INTERVAL_MS,
                    "Tick interval below minimum, ignored"
                ),
            },
            Self::Quit => {
                info!("Quit requested");
                controls.request_stop();
                return false;
            }
        }
        true
    }
}

/// Read commands from `reader` line by line and apply them until `quit`,
/// end of input, or a read error.
pub fn run_reader(reader: impl BufRead, controls: &Controls) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "stdin read failed, command input disabled");
                return;
            }
        };

        match line.parse::<Command>() {
            Ok(command) => {
                debug!(?command, "Command received");
                if !command.apply(controls) {
                    return;
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => warn!(error = %e, "Ignoring input line"),
        }
    }
    info!("stdin closed, command input ended");
}

/// Spawn the stdin command reader on a detached OS thread.
pub fn spawn_stdin_reader(controls: Controls) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("snake-stdin".to_owned())
        .spawn(move || run_reader(std::io::stdin().lock(), &controls))
}
