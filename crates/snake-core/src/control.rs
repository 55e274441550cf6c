//! Input-side handles: the shared direction and a cloneable control bundle.
//!
//! The direction is the only state written from outside the tick task. It
//! sits behind a single mutex that is held just long enough to copy or
//! replace the value, never across the rest of a tick.

use std::sync::{Arc, Mutex, PoisonError};

use snake_types::{Direction, DirectionError};
use tracing::debug;

use crate::operator::OperatorState;

/// The current heading, shared between input tasks and the tick loop.
#[derive(Debug, Default)]
pub struct DirectionControl {
    current: Mutex<Direction>,
}

impl DirectionControl {
    /// Create a control holding `initial`.
    pub const fn new(initial: Direction) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    /// Return the current direction.
    pub fn get(&self) -> Direction {
        // A poisoned lock still holds a valid `Copy` value.
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the current direction. Takes effect on the next tick.
    pub fn set(&self, direction: Direction) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = direction;
    }
}

/// Cloneable handle for input surfaces: direction changes plus operator
/// commands.
#[derive(Debug, Clone)]
pub struct Controls {
    direction: Arc<DirectionControl>,
    operator: Arc<OperatorState>,
}

impl Controls {
    /// Bundle the shared direction and operator state.
    pub const fn new(direction: Arc<DirectionControl>, operator: Arc<OperatorState>) -> Self {
        Self {
            direction,
            operator,
        }
    }

    /// Set the heading used from the next tick on.
    pub fn set_direction(&self, direction: Direction) {
        debug!(%direction, "direction set");
        self.direction.set(direction);
    }

    /// Set the heading from a raw `(dx, dy)` vector.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionError::InvalidDirection`] unless the vector is one
    /// of the four axis-aligned unit vectors; the heading is unchanged.
    pub fn try_set_direction(&self, delta: (i32, i32)) -> Result<(), DirectionError> {
        let direction = Direction::try_from(delta)?;
        self.set_direction(direction);
        Ok(())
    }

    /// Return the heading the next tick will use.
    pub fn direction(&self) -> Direction {
        self.direction.get()
    }

    /// Return the shared operator state.
    pub const fn operator(&self) -> &Arc<OperatorState> {
        &self.operator
    }

    /// Pause ticking.
    pub fn pause(&self) {
        self.operator.pause();
    }

    /// Resume ticking.
    pub fn resume(&self) {
        self.operator.resume();
    }

    /// Request a stop. The tick task finishes promptly, even mid-sleep.
    pub fn request_stop(&self) {
        self.operator.request_stop();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;

    use super::*;
    use crate::config::SimulationBoundsConfig;

    fn controls() -> Controls {
        Controls::new(
            Arc::new(DirectionControl::new(Direction::Right)),
            Arc::new(OperatorState::new(200, &SimulationBoundsConfig::default())),
        )
    }

    #[test]
    fn set_and_get() {
        let control = DirectionControl::new(Direction::Right);
        assert_eq!(control.get(), Direction::Right);
        control.set(Direction::Up);
        assert_eq!(control.get(), Direction::Up);
    }

    #[test]
    fn repeated_set_is_idempotent() {
        let c = controls();
        c.set_direction(Direction::Down);
        c.set_direction(Direction::Down);
        assert_eq!(c.direction(), Direction::Down);
    }

    #[test]
    fn raw_vector_accepted() {
        let c = controls();
        c.try_set_direction((-1, 0)).unwrap();
        assert_eq!(c.direction(), Direction::Left);
    }

    #[test]
    fn invalid_vector_leaves_direction_unchanged() {
        let c = controls();
        let err = c.try_set_direction((1, 1)).unwrap_err();
        assert_eq!(err, DirectionError::InvalidDirection { dx: 1, dy: 1 });
        assert_eq!(c.direction(), Direction::Right);
    }

    #[test]
    fn concurrent_writers_leave_a_valid_direction() {
        let c = controls();
        let handles: Vec<_> = Direction::ALL
            .into_iter()
            .map(|dir| {
                let c = c.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        c.set_direction(dir);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(Direction::ALL.contains(&c.direction()));
    }

    #[test]
    fn operator_commands_pass_through() {
        let c = controls();
        c.pause();
        assert!(c.operator().is_paused());
        c.resume();
        assert!(!c.operator().is_paused());
        c.request_stop();
        assert!(c.operator().is_stop_requested());
    }
}
