//! Core value structs: board cells, the snake state, and published frames.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;

/// A cell on the board, addressed by column `x` and row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column, in `[0, board_size)`.
    pub x: u32,
    /// Row, in `[0, board_size)`.
    pub y: u32,
}

impl Cell {
    /// Create a cell at `(x, y)`.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie in `[0, board_size)`.
    pub const fn in_bounds(self, board_size: u32) -> bool {
        self.x < board_size && self.y < board_size
    }

    /// Return the neighbouring cell one step in `direction`, wrapping
    /// around the edges of a `board_size` x `board_size` torus.
    ///
    /// Total for any input: coordinates are reduced modulo the board first,
    /// and a zero `board_size` is treated as a 1x1 board.
    pub const fn step(self, direction: Direction, board_size: u32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: wrap(self.x, dx, board_size),
            y: wrap(self.y, dy, board_size),
        }
    }
}

/// Move `coord` by a unit `delta` modulo `size`.
///
/// This is the `(c + d + N) mod N` rule, reduced before stepping so no
/// intermediate overflows.
const fn wrap(coord: u32, delta: i32, size: u32) -> u32 {
    let n = if size == 0 { 1 } else { size };
    let c = coord % n;
    match delta {
        1 => {
            if c + 1 == n {
                0
            } else {
                c + 1
            }
        }
        -1 => {
            if c == 0 {
                n - 1
            } else {
                c - 1
            }
        }
        _ => c,
    }
}

/// Immutable snapshot of the board: the food cell and the snake body.
///
/// The snake is ordered head first, tail last, and is never empty. A new
/// state replaces the old one wholesale on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Current food position.
    pub food: Cell,
    /// Snake body, head first.
    pub snake: Vec<Cell>,
}

impl SnakeState {
    /// Return the head of the snake.
    ///
    /// Returns `None` only for a malformed (empty) state; states built by
    /// the simulation always have a head.
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    /// Whether `cell` is occupied by any segment of the snake.
    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    /// Whether the food and every snake segment lie on the board.
    pub fn in_bounds(&self, board_size: u32) -> bool {
        self.food.in_bounds(board_size) && self.snake.iter().all(|c| c.in_bounds(board_size))
    }
}

/// A published snapshot: the board state plus the counters a renderer
/// displays next to it.
///
/// Score and length target travel with the state so subscribers never see
/// a score that belongs to a different board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Tick that produced this frame (0 for the initial frame).
    pub tick: u64,
    /// Score after this tick.
    pub score: u32,
    /// Snake length the body is growing (or shrinking) towards.
    pub length_target: usize,
    /// The board state after this tick.
    pub state: SnakeState,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_cell() {
        let cell = Cell::new(7, 7);
        assert_eq!(cell.step(Direction::Right, 16), Cell::new(8, 7));
        assert_eq!(cell.step(Direction::Left, 16), Cell::new(6, 7));
        assert_eq!(cell.step(Direction::Up, 16), Cell::new(7, 6));
        assert_eq!(cell.step(Direction::Down, 16), Cell::new(7, 8));
    }

    #[test]
    fn step_wraps_around_every_edge() {
        assert_eq!(Cell::new(15, 3).step(Direction::Right, 16), Cell::new(0, 3));
        assert_eq!(Cell::new(0, 3).step(Direction::Left, 16), Cell::new(15, 3));
        assert_eq!(Cell::new(4, 0).step(Direction::Up, 16), Cell::new(4, 15));
        assert_eq!(Cell::new(4, 15).step(Direction::Down, 16), Cell::new(4, 0));
    }

    #[test]
    fn step_on_single_cell_board_stays_put() {
        for dir in Direction::ALL {
            assert_eq!(Cell::new(0, 0).step(dir, 1), Cell::new(0, 0));
        }
    }

    #[test]
    fn step_from_off_board_cell_reduces_first() {
        let far = Cell::new(u32::MAX, u32::MAX);
        // u32::MAX % 16 == 15
        assert_eq!(far.step(Direction::Right, 16), Cell::new(0, 15));
        assert_eq!(far.step(Direction::Up, 16), Cell::new(15, 14));
        assert_eq!(far.step(Direction::Left, 16), Cell::new(14, 15));
    }

    #[test]
    fn step_on_zero_board_is_total() {
        let cell = Cell::new(3, 9);
        for dir in Direction::ALL {
            assert_eq!(cell.step(dir, 0), Cell::new(0, 0));
        }
    }

    #[test]
    fn bounds_check() {
        assert!(Cell::new(15, 15).in_bounds(16));
        assert!(!Cell::new(16, 0).in_bounds(16));
        assert!(!Cell::new(0, 16).in_bounds(16));
    }

    #[test]
    fn state_queries() {
        let state = SnakeState {
            food: Cell::new(5, 5),
            snake: vec![Cell::new(7, 7), Cell::new(6, 7)],
        };
        assert_eq!(state.head(), Some(Cell::new(7, 7)));
        assert!(state.occupies(Cell::new(6, 7)));
        assert!(!state.occupies(Cell::new(5, 5)));
        assert!(state.in_bounds(16));
        assert!(!state.in_bounds(7));
    }

    #[test]
    fn frame_serializes_to_json() {
        let frame = Frame {
            tick: 3,
            score: 1,
            length_target: 5,
            state: SnakeState {
                food: Cell::new(1, 2),
                snake: vec![Cell::new(3, 4)],
            },
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["tick"], 3);
        assert_eq!(json["state"]["food"]["x"], 1);
        assert_eq!(json["state"]["snake"][0]["y"], 4);

        let back: Frame = serde_json::from_value(json).unwrap();
        assert_eq!(back, frame);
    }
}
