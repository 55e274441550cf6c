//! Enumeration types for the Snake simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectionError;

/// Heading of the snake on the board.
///
/// Screen coordinates: `y` grows downwards, so [`Direction::Up`] is
/// `(0, -1)`. Only the four axis-aligned unit vectors are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards `y - 1`.
    Up,
    /// Towards `y + 1`.
    Down,
    /// Towards `x - 1`.
    Left,
    /// Towards `x + 1`.
    #[default]
    Right,
}

impl Direction {
    /// All four directions, in input-control order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Return the `(dx, dy)` unit vector for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Return the direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = DirectionError;

    fn try_from((dx, dy): (i32, i32)) -> Result<Self, Self::Error> {
        match (dx, dy) {
            (0, -1) => Ok(Self::Up),
            (0, 1) => Ok(Self::Down),
            (-1, 0) => Ok(Self::Left),
            (1, 0) => Ok(Self::Right),
            _ => Err(DirectionError::InvalidDirection { dx, dy }),
        }
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    /// Parse a direction name or its WASD key, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "w" => Ok(Self::Up),
            "down" | "s" => Ok(Self::Down),
            "left" | "a" => Ok(Self::Left),
            "right" | "d" => Ok(Self::Right),
            other => Err(DirectionError::Unknown {
                input: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}
