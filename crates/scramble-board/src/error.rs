//! Board errors.
//!
//! All board errors use the `BOARD_` code prefix and implement
//! [`ErrorCode`] for unified handling:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`FlipError::NoCard`] | `BOARD_NO_CARD` | No |
//! | [`FlipError::Controlled`] | `BOARD_CONTROLLED` | Yes |
//! | [`FlipError::OutOfRange`] | `BOARD_OUT_OF_RANGE` | No |
//! | [`BoardSetupError::BadDimensions`] | `BOARD_BAD_DIMENSIONS` | No |
//! | [`BoardSetupError::ValueCount`] | `BOARD_VALUE_COUNT` | No |
//! | [`BoardSetupError::InvalidValue`] | `BOARD_INVALID_VALUE` | No |
//!
//! A flip error never leaves the board inconsistent: the failing
//! player's turn state is reset and any held card control is released
//! before the error is returned.

use scramble_types::{ErrorCode, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a `flip` call.
///
/// # Recoverability
///
/// - [`Controlled`](Self::Controlled) is **recoverable**: the holding
///   player will eventually release or lose the card.
/// - [`NoCard`](Self::NoCard) is **not**: a removed card never comes
///   back.
/// - [`OutOfRange`](Self::OutOfRange) is **not**: the board does not
///   grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum FlipError {
    /// The target cell holds no card.
    ///
    /// Raised when the target was already removed, or when a flip that
    /// waited for a controlled card wakes up to find it removed.
    #[error("no card at {0}")]
    NoCard(Position),

    /// The second-flip target is controlled.
    ///
    /// Any controller counts, including the flipping player: a player
    /// cannot pick their own first card as the second card of the pair.
    #[error("card at {0} is controlled")]
    Controlled(Position),

    /// The coordinates are outside the board.
    ///
    /// Defensive; front ends are expected to validate before calling.
    #[error("position {pos} out of range for {rows}x{cols} board")]
    OutOfRange {
        /// The rejected coordinate.
        pos: Position,
        /// Board height.
        rows: usize,
        /// Board width.
        cols: usize,
    },
}

impl ErrorCode for FlipError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoCard(_) => "BOARD_NO_CARD",
            Self::Controlled(_) => "BOARD_CONTROLLED",
            Self::OutOfRange { .. } => "BOARD_OUT_OF_RANGE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NoCard(_) => false,
            Self::Controlled(_) => true,
            Self::OutOfRange { .. } => false,
        }
    }
}

/// Failure to construct a board from `(rows, cols, values)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardSetupError {
    /// Rows and columns must both be positive.
    #[error("board dimensions must be positive, got {rows}x{cols}")]
    BadDimensions {
        /// Requested height.
        rows: usize,
        /// Requested width.
        cols: usize,
    },

    /// The value sequence does not cover the board exactly.
    #[error("expected {expected} card values, got {actual}")]
    ValueCount {
        /// `rows * cols`.
        expected: usize,
        /// Length of the supplied sequence.
        actual: usize,
    },

    /// A card value is empty or contains whitespace.
    #[error("card value at index {index} is empty or contains whitespace: {value:?}")]
    InvalidValue {
        /// Row-major index of the offending value.
        index: usize,
        /// The offending value.
        value: String,
    },
}

impl ErrorCode for BoardSetupError {
    fn code(&self) -> &'static str {
        match self {
            Self::BadDimensions { .. } => "BOARD_BAD_DIMENSIONS",
            Self::ValueCount { .. } => "BOARD_VALUE_COUNT",
            Self::InvalidValue { .. } => "BOARD_INVALID_VALUE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scramble_types::assert_error_codes;

    fn all_flip_variants() -> Vec<FlipError> {
        vec![
            FlipError::NoCard(Position::new(0, 0)),
            FlipError::Controlled(Position::new(0, 0)),
            FlipError::OutOfRange {
                pos: Position::new(9, 9),
                rows: 3,
                cols: 3,
            },
        ]
    }

    fn all_setup_variants() -> Vec<BoardSetupError> {
        vec![
            BoardSetupError::BadDimensions { rows: 0, cols: 3 },
            BoardSetupError::ValueCount {
                expected: 9,
                actual: 4,
            },
            BoardSetupError::InvalidValue {
                index: 2,
                value: "a b".to_string(),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_flip_variants(), "BOARD_");
        assert_error_codes(&all_setup_variants(), "BOARD_");
    }

    #[test]
    fn only_controlled_is_recoverable() {
        for err in all_flip_variants() {
            assert_eq!(
                err.is_recoverable(),
                matches!(err, FlipError::Controlled(_)),
                "unexpected recoverability for {err:?}"
            );
        }
        for err in all_setup_variants() {
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn display_messages() {
        let err = FlipError::NoCard(Position::new(1, 2));
        assert_eq!(err.to_string(), "no card at (1,2)");

        let err = FlipError::OutOfRange {
            pos: Position::new(9, 9),
            rows: 5,
            cols: 5,
        };
        assert!(err.to_string().contains("out of range"));

        let err = BoardSetupError::ValueCount {
            expected: 25,
            actual: 24,
        };
        assert!(err.to_string().contains("expected 25"));
    }

    #[test]
    fn flip_error_serde_round_trip() {
        let err = FlipError::Controlled(Position::new(2, 3));
        let json = serde_json::to_string(&err).unwrap();
        let back: FlipError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
