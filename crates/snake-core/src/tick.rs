//! Tick cycle: the single step that advances the Snake simulation.
//!
//! Each tick runs these steps in order:
//!
//! 1. **Move** -- compute the new head one cell along the current
//!    direction, wrapping around the board edges.
//! 2. **Eat** -- if the new head is on the food: score +1, length
//!    target +1, and a fresh food cell is drawn from the [`FoodSource`].
//! 3. **Collide** -- if the new head is on any cell of the *pre-tick*
//!    body: score and length target are reset.
//! 4. **Rebuild** -- the new body is the new head followed by the first
//!    `length_target - 1` cells of the old body, so the snake grows one
//!    segment per tick towards its target rather than all at once.
//!
//! Steps 2 and 3 are independent. When the new head sits on both the
//! food and the body, both fire, eat first: the score ends at 0, the
//! length target ends at its initial value, and the food still moves.
//!
//! The step is total. It never fails and never leaves the board.

use snake_types::{Cell, Direction, Frame, SnakeState};
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig, check_board};
use crate::food::FoodSource;

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// The tick number that was executed (1 for the first tick).
    pub tick: u64,
    /// The direction the snake moved in.
    pub direction: Direction,
    /// New head position.
    pub head: Cell,
    /// Whether the snake ate this tick.
    pub ate_food: bool,
    /// Whether the snake ran into itself this tick.
    pub self_collision: bool,
    /// Score after this tick.
    pub score: u32,
    /// Length target after this tick.
    pub length_target: usize,
    /// Snake length after this tick.
    pub snake_len: usize,
}

/// The mutable simulation context advanced by the tick cycle.
///
/// Owns the current snapshot and the counters that live alongside it.
/// The direction is not stored here: the runner reads it from shared
/// state and passes it into [`GameState::advance`].
#[derive(Debug, Clone)]
pub struct GameState {
    state: SnakeState,
    score: u32,
    length_target: usize,
    initial_length_target: usize,
    board_size: u32,
    tick: u64,
}

impl GameState {
    /// Create the initial state described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails
    /// [`GameConfig::validate`].
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::from_parts(
            SnakeState {
                food: config.initial_food,
                snake: config.initial_snake.clone(),
            },
            config.board_size,
            config.initial_length_target,
        )
    }

    /// Create a state from explicit parts (useful for testing and state
    /// restoration). Score starts at 0 and the length target at
    /// `initial_length_target`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] unless the board size is in
    /// `1..=MAX_BOARD_SIZE`, the body is non-empty, every cell is on the
    /// board, and the length target is at least 1.
    pub fn from_parts(
        state: SnakeState,
        board_size: u32,
        initial_length_target: usize,
    ) -> Result<Self, ConfigError> {
        check_board(board_size, state.food, &state.snake, initial_length_target)?;
        Ok(Self {
            state,
            score: 0,
            length_target: initial_length_target,
            initial_length_target,
            board_size,
            tick: 0,
        })
    }

    /// Return the current snapshot.
    pub const fn snake_state(&self) -> &SnakeState {
        &self.state
    }

    /// Return the current score.
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Return the current length target.
    pub const fn length_target(&self) -> usize {
        self.length_target
    }

    /// Return the number of ticks executed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the board side length.
    pub const fn board_size(&self) -> u32 {
        self.board_size
    }

    /// Build the publishable frame for the current state.
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.tick,
            score: self.score,
            length_target: self.length_target,
            state: self.state.clone(),
        }
    }

    /// Execute one tick moving in `direction`.
    pub fn advance(&mut self, direction: Direction, food: &mut dyn FoodSource) -> TickOutcome {
        self.tick = self.tick.saturating_add(1);

        // Construction rejects an empty body; fall back to the food cell
        // rather than panic.
        let head = self.state.head().unwrap_or(self.state.food);
        let new_head = head.step(direction, self.board_size);

        let ate_food = new_head == self.state.food;
        let mut next_food = self.state.food;
        if ate_food {
            self.score = self.score.saturating_add(1);
            self.length_target = self.length_target.saturating_add(1);
            next_food = food.next_food(self.board_size);
            debug!(tick = self.tick, score = self.score, food = ?next_food, "food eaten");
        }

        let self_collision = self.state.occupies(new_head);
        if self_collision {
            info!(
                tick = self.tick,
                lost_score = self.score,
                head = ?new_head,
                "self collision, resetting score"
            );
            self.score = 0;
            self.length_target = self.initial_length_target;
        }

        let keep = self.length_target.saturating_sub(1);
        let mut snake = Vec::with_capacity(keep.saturating_add(1));
        snake.push(new_head);
        snake.extend(self.state.snake.iter().take(keep).copied());

        self.state = SnakeState {
            food: next_food,
            snake,
        };

        TickOutcome {
            tick: self.tick,
            direction,
            head: new_head,
            ate_food,
            self_collision,
            score: self.score,
            length_target: self.length_target,
            snake_len: self.state.snake.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::food::{RandomFood, ScriptedFood};
    use snake_types::BOARD_SIZE;

    fn state_with(food: Cell, snake: Vec<Cell>) -> GameState {
        GameState::from_parts(SnakeState { food, snake }, BOARD_SIZE, 4).unwrap()
    }

    #[test]
    fn initial_state_matches_config() {
        let state = GameState::new(&GameConfig::default()).unwrap();
        assert_eq!(state.snake_state().food, Cell::new(5, 5));
        assert_eq!(state.snake_state().snake, vec![Cell::new(7, 7)]);
        assert_eq!(state.score(), 0);
        assert_eq!(state.length_target(), 4);
        assert_eq!(state.tick(), 0);
        assert_eq!(state.frame().tick, 0);
    }

    #[test]
    fn moves_one_cell_per_tick() {
        let mut state = state_with(Cell::new(0, 0), vec![Cell::new(7, 7)]);
        let mut food = ScriptedFood::default();
        let outcome = state.advance(Direction::Right, &mut food);
        assert_eq!(outcome.tick, 1);
        assert_eq!(outcome.head, Cell::new(8, 7));
        assert!(!outcome.ate_food);
        assert!(!outcome.self_collision);
        assert_eq!(state.snake_state().snake, vec![Cell::new(8, 7), Cell::new(7, 7)]);
    }

    #[test]
    fn wraps_past_the_right_edge() {
        let mut state = state_with(Cell::new(0, 0), vec![Cell::new(BOARD_SIZE - 1, 3)]);
        let outcome = state.advance(Direction::Right, &mut ScriptedFood::default());
        assert_eq!(outcome.head, Cell::new(0, 3));
    }

    #[test]
    fn wraps_past_the_top_edge() {
        let mut state = state_with(Cell::new(0, 0), vec![Cell::new(3, 0)]);
        let outcome = state.advance(Direction::Up, &mut ScriptedFood::default());
        assert_eq!(outcome.head, Cell::new(3, BOARD_SIZE - 1));
    }

    #[test]
    fn eating_scores_and_moves_food() {
        let mut state = state_with(Cell::new(5, 5), vec![Cell::new(4, 5)]);
        let mut food = ScriptedFood::new([Cell::new(10, 12)]);
        let outcome = state.advance(Direction::Right, &mut food);

        assert!(outcome.ate_food);
        assert_eq!(outcome.head, Cell::new(5, 5));
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.length_target, 5);
        assert_eq!(state.snake_state().food, Cell::new(10, 12));
    }

    #[test]
    fn food_resample_may_repeat_the_old_cell() {
        let mut state = state_with(Cell::new(5, 5), vec![Cell::new(4, 5)]);
        let mut food = ScriptedFood::new([Cell::new(5, 5)]);
        let outcome = state.advance(Direction::Right, &mut food);
        assert!(outcome.ate_food);
        assert_eq!(state.snake_state().food, Cell::new(5, 5));
    }

    #[test]
    fn food_untouched_when_not_eaten() {
        let mut state = state_with(Cell::new(5, 5), vec![Cell::new(7, 7)]);
        let mut food = ScriptedFood::new([Cell::new(1, 1)]);
        let _ = state.advance(Direction::Down, &mut food);
        assert_eq!(state.snake_state().food, Cell::new(5, 5));
    }

    #[test]
    fn growth_is_one_segment_per_tick() {
        let mut state = state_with(Cell::new(0, 0), vec![Cell::new(7, 7)]);
        let mut food = ScriptedFood::default();
        let lengths: Vec<usize> = (0..6)
            .map(|_| state.advance(Direction::Right, &mut food).snake_len)
            .collect();
        assert_eq!(lengths, vec![2, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn growth_after_eating_is_gradual() {
        // Length 4 at target 4, food straight ahead.
        let body = vec![Cell::new(4, 5), Cell::new(3, 5), Cell::new(2, 5), Cell::new(1, 5)];
        let mut state = state_with(Cell::new(5, 5), body);
        let mut food = ScriptedFood::new([Cell::new(0, 15)]);

        let first = state.advance(Direction::Right, &mut food);
        assert!(first.ate_food);
        assert_eq!(first.length_target, 5);
        // The body reaches the new target on the eating tick itself, never
        // more than one segment longer than before.
        assert_eq!(first.snake_len, 5);

        let second = state.advance(Direction::Right, &mut food);
        assert_eq!(second.snake_len, 5);
    }

    #[test]
    fn length_never_jumps_by_more_than_one() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        let mut food = RandomFood::seeded(3);
        let mut prev = state.snake_state().snake.len();
        for i in 0..2000_u32 {
            let dir = Direction::ALL[(i / 5 % 4) as usize];
            let outcome = state.advance(dir, &mut food);
            if !outcome.self_collision {
                assert!(outcome.snake_len <= prev + 1);
            }
            prev = outcome.snake_len;
        }
    }

    #[test]
    fn self_collision_resets_counters() {
        // Head at (5,5) moving right lands on (6,5), which is body.
        let body = vec![Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)];
        let mut state = state_with(Cell::new(0, 0), body);
        state.score = 7;
        state.length_target = 9;

        let outcome = state.advance(Direction::Right, &mut ScriptedFood::default());
        assert!(outcome.self_collision);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.length_target, 4);
        assert_eq!(
            state.snake_state().snake,
            vec![Cell::new(6, 5), Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)]
        );
    }

    #[test]
    fn reset_truncates_a_long_body_immediately() {
        let body: Vec<Cell> = (0..8).map(|x| Cell::new(8 - x, 2)).collect();
        let mut state = state_with(Cell::new(0, 0), body);
        state.length_target = 8;

        // Reversing into the neck is a collision.
        let outcome = state.advance(Direction::Left, &mut ScriptedFood::default());
        assert!(outcome.self_collision);
        assert_eq!(outcome.snake_len, 4);
    }

    #[test]
    fn tail_cell_counts_as_body() {
        // Square loop: moving up from (1,1) enters (1,0), the current tail.
        let body = vec![Cell::new(1, 1), Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0)];
        let mut state = state_with(Cell::new(9, 9), body);
        let outcome = state.advance(Direction::Up, &mut ScriptedFood::default());
        assert!(outcome.self_collision);
    }

    #[test]
    fn food_on_body_fires_both_rules_eat_first() {
        let body = vec![Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)];
        let mut state = state_with(Cell::new(6, 5), body);
        state.score = 3;
        let mut food = ScriptedFood::new([Cell::new(12, 12)]);

        let outcome = state.advance(Direction::Right, &mut food);
        assert!(outcome.ate_food);
        assert!(outcome.self_collision);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.length_target, 4);
        assert_eq!(state.snake_state().food, Cell::new(12, 12));
    }

    #[test]
    fn coordinates_stay_on_board() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        let mut food = RandomFood::seeded(11);
        for i in 0..5000_u32 {
            let dir = Direction::ALL[(i.wrapping_mul(7) / 3 % 4) as usize];
            let _ = state.advance(dir, &mut food);
            assert!(state.snake_state().in_bounds(BOARD_SIZE));
            assert!(!state.snake_state().snake.is_empty());
        }
    }

    #[test]
    fn rejects_a_zero_board() {
        let parts = SnakeState {
            food: Cell::new(0, 0),
            snake: vec![Cell::new(0, 0)],
        };
        let result = GameState::from_parts(parts, 0, 4);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_cells_off_the_board() {
        let far_head = SnakeState {
            food: Cell::new(0, 0),
            snake: vec![Cell::new(u32::MAX, 0)],
        };
        assert!(matches!(
            GameState::from_parts(far_head, BOARD_SIZE, 4),
            Err(ConfigError::Invalid { .. })
        ));

        let far_food = SnakeState {
            food: Cell::new(BOARD_SIZE, 3),
            snake: vec![Cell::new(1, 1)],
        };
        assert!(matches!(
            GameState::from_parts(far_food, BOARD_SIZE, 4),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_empty_body_and_zero_target() {
        let empty = SnakeState {
            food: Cell::new(0, 0),
            snake: Vec::new(),
        };
        assert!(GameState::from_parts(empty, BOARD_SIZE, 4).is_err());

        let zero_target = SnakeState {
            food: Cell::new(0, 0),
            snake: vec![Cell::new(1, 1)],
        };
        assert!(GameState::from_parts(zero_target, BOARD_SIZE, 0).is_err());
    }

    #[test]
    fn new_rejects_an_invalid_config() {
        let config = GameConfig {
            board_size: 0,
            ..GameConfig::default()
        };
        assert!(GameState::new(&config).is_err());
    }

    #[test]
    fn frame_carries_counters() {
        let mut state = state_with(Cell::new(5, 5), vec![Cell::new(4, 5)]);
        let _ = state.advance(Direction::Right, &mut ScriptedFood::new([Cell::new(1, 1)]));
        let frame = state.frame();
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.score, 1);
        assert_eq!(frame.length_target, 5);
        assert_eq!(frame.state.snake[0], Cell::new(5, 5));
    }
}
