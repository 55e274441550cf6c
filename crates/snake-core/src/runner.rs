//! Simulation loop runner with operator controls.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Fixed cadence**: sleep for the tick interval, then tick. Sleeping is
//!   not work-preserving; a host that was descheduled simply skips ticks.
//! - **Pause/resume**: the loop parks without ticking while paused.
//! - **Variable tick speed**: the interval is re-read before every sleep.
//! - **Bounded runs**: stop after `max_ticks`.
//! - **Cooperative cancellation**: a stop request interrupts the sleep or
//!   the pause and ends the loop before the next tick.
//!
//! The runner wraps the single-tick [`GameState::advance`] and adds the
//! control plane around it.

use std::time::Duration;

use snake_types::Frame;
use tracing::{debug, info};

use crate::control::DirectionControl;
use crate::food::FoodSource;
use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{GameState, TickOutcome};

/// Result of the simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick outcome, if any tick completed.
    pub final_outcome: Option<TickOutcome>,
    /// The state at the moment the loop ended.
    pub final_frame: Frame,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations publish the new state to subscribers, record
/// statistics, and so on. The callback runs on the tick task, so it must
/// not block.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, outcome: &TickOutcome, state: &GameState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _outcome: &TickOutcome, _state: &GameState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Each iteration parks while paused, sleeps for the current tick
/// interval, copies the direction under its lock, advances `state` by one
/// tick, and hands the result to `callback`.
pub async fn run_simulation(
    state: &mut GameState,
    food: &mut dyn FoodSource,
    direction: &DirectionControl,
    operator: &OperatorState,
    callback: &mut dyn TickCallback,
) -> SimulationResult {
    let mut last_outcome: Option<TickOutcome> = None;
    let mut total_ticks: u64 = 0;

    info!(
        board_size = state.board_size(),
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!(tick = state.tick(), "Simulation paused, waiting for resume...");
            tokio::select! {
                () = operator.wait_if_paused() => info!("Simulation resumed"),
                () = operator.wait_for_stop() => {}
            }
        }

        // --- Check stop request (before sleep) ---
        if operator.is_stop_requested() {
            return finish(
                SimulationEndReason::OperatorStop,
                state,
                operator,
                last_outcome,
                total_ticks,
            )
            .await;
        }

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        tokio::select! {
            () = tokio::time::sleep(Duration::from_millis(interval_ms)) => {}
            // Loop back so the stop check above ends the run.
            () = operator.wait_for_stop() => continue,
        }

        // A pause that arrived mid-sleep holds this tick back.
        if operator.is_paused() || operator.is_stop_requested() {
            continue;
        }

        // --- Execute tick ---
        let heading = direction.get();
        let outcome = state.advance(heading, food);
        total_ticks = total_ticks.saturating_add(1);
        debug!(
            tick = outcome.tick,
            head = ?outcome.head,
            score = outcome.score,
            len = outcome.snake_len,
            "Tick complete"
        );

        // --- Notify callback ---
        callback.on_tick(&outcome, state);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(outcome.tick) {
            info!(
                tick = outcome.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return finish(
                SimulationEndReason::MaxTicksReached,
                state,
                operator,
                Some(outcome),
                total_ticks,
            )
            .await;
        }

        last_outcome = Some(outcome);
    }
}

async fn finish(
    reason: SimulationEndReason,
    state: &GameState,
    operator: &OperatorState,
    final_outcome: Option<TickOutcome>,
    total_ticks: u64,
) -> SimulationResult {
    operator.set_end_reason(reason).await;
    SimulationResult {
        end_reason: reason,
        final_outcome,
        final_frame: state.frame(),
        total_ticks,
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_frame.tick,
        final_score = result.final_frame.score,
        final_length = result.final_frame.state.snake.len(),
        "Simulation ended"
    );
}
