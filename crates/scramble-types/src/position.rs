//! Grid coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based `(row, col)` coordinate of a board cell.
///
/// A `Position` is just a coordinate; it says nothing about whether the
/// board it is used against contains it. Bounds are checked by the board
/// at the operation entry point.
///
/// # Example
///
/// ```
/// use scramble_types::Position;
///
/// let pos = Position::new(2, 3);
/// assert_eq!(pos.row, 2);
/// assert_eq!(pos.col, 3);
/// assert_eq!(pos.to_string(), "(2,3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index, `0 ≤ row < rows`.
    pub row: usize,
    /// Column index, `0 ≤ col < cols`.
    pub col: usize,
}

impl Position {
    /// Creates a position from row and column indices.
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
