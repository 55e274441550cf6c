//! Error types for value construction.

/// Errors produced when converting raw input into a [`Direction`].
///
/// [`Direction`]: crate::Direction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectionError {
    /// The vector is not one of the four unit vectors.
    #[error("invalid direction vector ({dx}, {dy}): expected a unit vector along one axis")]
    InvalidDirection {
        /// Horizontal component of the rejected vector.
        dx: i32,
        /// Vertical component of the rejected vector.
        dy: i32,
    },

    /// The string does not name a direction.
    #[error("unknown direction: {input}")]
    Unknown {
        /// The rejected input.
        input: String,
    },
}
