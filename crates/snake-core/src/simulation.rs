//! The running simulation: a background tick task plus the handles that
//! read from and write to it.
//!
//! [`Simulation::start`] builds the initial [`GameState`] from
//! configuration and spawns [`run_simulation`] on the current tokio
//! runtime. Frames are published through a `watch` channel, so every
//! subscriber sees whole snapshots and a late subscriber starts at the
//! latest one rather than replaying history.
//!
//! Dropping the [`Simulation`] requests a stop; [`Simulation::stop`] does
//! the same and also waits for the task and returns its result.

use std::sync::Arc;

use futures::Stream;
use snake_types::{Direction, DirectionError, Frame};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig, SimulationBoundsConfig};
use crate::control::{Controls, DirectionControl};
use crate::food::{FoodSource, RandomFood};
use crate::operator::OperatorState;
use crate::runner::{SimulationResult, TickCallback, run_simulation};
use crate::tick::{GameState, TickOutcome};

/// Errors that can occur while starting or joining a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The game configuration is invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// `start` was called outside a tokio runtime.
    #[error("no tokio runtime available to run the tick task")]
    NoRuntime,

    /// The tick task was already joined.
    #[error("tick task already joined")]
    AlreadyJoined,

    /// The tick task panicked or was aborted.
    #[error("tick task failed: {source}")]
    TaskFailed {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Tick callback that publishes each new frame to subscribers.
struct FramePublisher {
    tx: watch::Sender<Arc<Frame>>,
}

impl TickCallback for FramePublisher {
    fn on_tick(&mut self, outcome: &TickOutcome, state: &GameState) {
        let _previous = self.tx.send_replace(Arc::new(state.frame()));
        debug!(
            tick = outcome.tick,
            receivers = self.tx.receiver_count(),
            "Frame published"
        );
    }
}

/// A running Snake simulation.
#[derive(Debug)]
pub struct Simulation {
    controls: Controls,
    frames: watch::Receiver<Arc<Frame>>,
    task: Option<JoinHandle<SimulationResult>>,
}

impl Simulation {
    /// Start a simulation with random food placement, seeded from
    /// `config.seed` when set.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] if `config` fails validation, or
    /// [`SimulationError::NoRuntime`] outside a tokio runtime.
    pub fn start(
        config: &GameConfig,
        bounds: &SimulationBoundsConfig,
    ) -> Result<Self, SimulationError> {
        Self::start_with_food(config, bounds, Box::new(RandomFood::from_seed_option(config.seed)))
    }

    /// Start a simulation that draws food positions from `food`.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::start`].
    pub fn start_with_food(
        config: &GameConfig,
        bounds: &SimulationBoundsConfig,
        mut food: Box<dyn FoodSource>,
    ) -> Result<Self, SimulationError> {
        let mut state = GameState::new(config)?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_no_rt| SimulationError::NoRuntime)?;

        let (tx, frames) = watch::channel(Arc::new(state.frame()));
        let direction = Arc::new(DirectionControl::new(config.initial_direction));
        let operator = Arc::new(OperatorState::new(config.tick_interval_ms, bounds));

        let task = {
            let direction = Arc::clone(&direction);
            let operator = Arc::clone(&operator);
            runtime.spawn(async move {
                let mut publisher = FramePublisher { tx };
                run_simulation(
                    &mut state,
                    food.as_mut(),
                    &direction,
                    &operator,
                    &mut publisher,
                )
                .await
            })
        };

        info!(
            board_size = config.board_size,
            tick_interval_ms = config.tick_interval_ms,
            seeded = config.seed.is_some(),
            "Simulation task spawned"
        );

        Ok(Self {
            controls: Controls::new(direction, operator),
            frames,
            task: Some(task),
        })
    }

    /// Set the heading used from the next tick on.
    pub fn set_direction(&self, direction: Direction) {
        self.controls.set_direction(direction);
    }

    /// Set the heading from a raw `(dx, dy)` vector.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionError::InvalidDirection`] for anything but the
    /// four unit vectors.
    pub fn try_set_direction(&self, delta: (i32, i32)) -> Result<(), DirectionError> {
        self.controls.try_set_direction(delta)
    }

    /// Return a cloneable handle for input surfaces.
    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    /// Return the shared operator state.
    pub const fn operator(&self) -> &Arc<OperatorState> {
        self.controls.operator()
    }

    /// Subscribe to frames, starting with the latest one.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.frames.clone())
    }

    /// Return the most recently published frame.
    pub fn latest(&self) -> Arc<Frame> {
        Arc::clone(&self.frames.borrow())
    }

    /// Whether the tick task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Request a stop and wait for the tick task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::TaskFailed`] if the tick task panicked.
    pub async fn stop(mut self) -> Result<SimulationResult, SimulationError> {
        self.controls.request_stop();
        self.join_task().await
    }

    /// Wait for the simulation to end on its own (tick limit or a stop
    /// requested through [`Controls`]).
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::TaskFailed`] if the tick task panicked.
    pub async fn join(mut self) -> Result<SimulationResult, SimulationError> {
        self.join_task().await
    }

    async fn join_task(&mut self) -> Result<SimulationResult, SimulationError> {
        match self.task.take() {
            Some(task) => Ok(task.await?),
            None => Err(SimulationError::AlreadyJoined),
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.controls.request_stop();
        }
    }
}

/// A subscriber's view of the frame sequence.
///
/// The first call to [`Subscription::next`] yields the frame that was
/// current at subscription time; each later call waits for the next
/// published frame. A subscriber that falls behind skips straight to the
/// newest frame. The sequence ends once the simulation has stopped and
/// the final frame has been seen.
#[derive(Debug, Clone)]
pub struct Subscription {
    rx: watch::Receiver<Arc<Frame>>,
}

impl Subscription {
    fn new(mut rx: watch::Receiver<Arc<Frame>>) -> Self {
        rx.mark_changed();
        Self { rx }
    }

    /// Wait for the next frame. Returns `None` once the simulation ended.
    pub async fn next(&mut self) -> Option<Arc<Frame>> {
        match self.rx.changed().await {
            Ok(()) => Some(Arc::clone(&self.rx.borrow_and_update())),
            Err(_closed) => None,
        }
    }

    /// Convert into a [`Stream`] of frames.
    pub fn into_stream(self) -> impl Stream<Item = Arc<Frame>> + Send + Unpin {
        Box::pin(futures::stream::unfold(self, |mut sub| async move {
            sub.next().await.map(|frame| (frame, sub))
        }))
    }
}
