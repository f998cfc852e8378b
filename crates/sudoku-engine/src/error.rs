use thiserror::Error;

/// Errors surfaced by grid construction and checked coordinate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The side length has no integer square root, so the box size is
    /// undefined. Fatal at construction.
    #[error("side length {0} is not a perfect square")]
    InvalidSideLength(usize),

    /// A coordinate outside `0..size`. Surfaced, never clamped.
    #[error("position ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        size: usize,
    },
}
