//! Shared type definitions for the Snake simulation.
//!
//! This crate is the single source of truth for the values that cross the
//! boundary between the simulation core and its collaborators (renderers
//! subscribe to [`Frame`]s, input surfaces send [`Direction`]s).
//!
//! # Modules
//!
//! - [`enums`] -- The closed [`Direction`] enumeration and its parsing.
//! - [`structs`] -- Board cells, the snake state snapshot, and published frames.
//! - [`error`] -- [`DirectionError`] for rejected direction input.

pub mod enums;
pub mod error;
pub mod structs;

pub use enums::Direction;
pub use error::DirectionError;
pub use structs::{Cell, Frame, SnakeState};

/// Default side length of the square board.
pub const BOARD_SIZE: u32 = 16;
