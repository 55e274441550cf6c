//! Food source trait and implementations.
//!
//! When the snake eats, the tick cycle asks a [`FoodSource`] for the next
//! food cell. [`RandomFood`] draws uniformly over the whole board, which
//! means the new food may land on the snake itself; nothing excludes
//! occupied cells. [`ScriptedFood`] replays a fixed sequence and exists so
//! tests can pin down where food appears.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snake_types::Cell;

/// A source of new food positions.
pub trait FoodSource: Send {
    /// Return the next food cell for a `board_size` x `board_size` board.
    ///
    /// The returned cell must lie on the board.
    fn next_food(&mut self, board_size: u32) -> Cell;
}

/// Uniform random food placement over the full board.
#[derive(Debug, Clone)]
pub struct RandomFood {
    rng: StdRng,
}

impl RandomFood {
    /// Create a food source seeded for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a food source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a seeded source when `seed` is set, an entropy-seeded one
    /// otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl FoodSource for RandomFood {
    fn next_food(&mut self, board_size: u32) -> Cell {
        let n = board_size.max(1);
        Cell::new(self.rng.random_range(0..n), self.rng.random_range(0..n))
    }
}

/// Food placement from a fixed script, for tests and replays.
///
/// Cells are returned in order, reduced modulo the board size. Once the
/// script is exhausted the last cell repeats; an empty script yields the
/// origin.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFood {
    script: VecDeque<Cell>,
    last: Option<Cell>,
}

impl ScriptedFood {
    /// Create a scripted source from the given cells.
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            script: cells.into_iter().collect(),
            last: None,
        }
    }
}

impl FoodSource for ScriptedFood {
    fn next_food(&mut self, board_size: u32) -> Cell {
        let n = board_size.max(1);
        let cell = self
            .script
            .pop_front()
            .or(self.last)
            .unwrap_or(Cell::new(0, 0));
        self.last = Some(cell);
        Cell::new(cell.x % n, cell.y % n)
    }
}
