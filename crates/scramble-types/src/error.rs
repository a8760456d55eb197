//! Unified error interface.
//!
//! Every error type in the workspace implements [`ErrorCode`] so callers
//! get a stable, machine-readable code and a recoverability hint without
//! matching on concrete variants.
//!
//! # Code Format
//!
//! - **UPPER_SNAKE_CASE**: e.g. `"BOARD_NO_CARD"`
//! - **Domain-prefixed**: board errors use the `BOARD_` prefix
//! - **Stable**: a code never changes once published (API contract)
//!
//! # Recoverability
//!
//! An error is **recoverable** when retrying the same call may succeed
//! later (a contended card may be released). It is not recoverable when
//! the condition is permanent (a removed card never comes back) or the
//! input is wrong (out-of-range coordinates stay out of range).
//!
//! # Example
//!
//! ```
//! use scramble_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Busy,
//!     Gone,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Busy => "MY_BUSY",
//!             Self::Gone => "MY_GONE",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(MyError::Busy.code(), "MY_BUSY");
//! assert!(MyError::Busy.is_recoverable());
//! ```

/// Machine-readable error code interface.
pub trait ErrorCode {
    /// Returns the stable UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that every error in `errors` carries a well-formed code:
/// the expected domain prefix followed by at least one `_`-separated
/// segment of ASCII capitals and digits.
///
/// Intended for a test that enumerates all variants of an error enum,
/// so a new variant with a malformed code fails loudly.
///
/// # Panics
///
/// Panics on the first violating code.
///
/// # Example
///
/// ```
/// use scramble_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { A, B }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "MY_A",
///             Self::B => "MY_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[MyError::A, MyError::B], "MY_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], prefix: &str) {
    for err in errors {
        let code = err.code();
        assert!(
            well_formed(code, prefix),
            "error code {code:?} must be UPPER_SNAKE_CASE with the {prefix:?} prefix"
        );
    }
}

/// A code is well-formed when stripping the prefix leaves something,
/// and splitting the whole code on `_` yields only non-empty runs of
/// ASCII capitals and digits. Empty segments cover every underscore
/// misuse at once: leading, trailing, and doubled.
fn well_formed(code: &str, prefix: &str) -> bool {
    let Some(rest) = code.strip_prefix(prefix) else {
        return false;
    };
    !rest.is_empty()
        && code.split('_').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn error_code_trait() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn assert_error_codes_all_variants() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must be UPPER_SNAKE_CASE")]
    fn wrong_prefix_panics() {
        assert_error_codes(&[TestError::Transient], "WRONG_");
    }

    #[test]
    fn well_formed_accepts_conventional_codes() {
        assert!(well_formed("TEST_TRANSIENT", "TEST_"));
        assert!(well_formed("TEST_RETRY_2", "TEST_"));
        assert!(well_formed("X_1", "X_"));
    }

    #[test]
    fn well_formed_requires_the_prefix_and_a_remainder() {
        assert!(!well_formed("", "TEST_"));
        assert!(!well_formed("TEST_", "TEST_"));
        assert!(!well_formed("OTHER_THING", "TEST_"));
    }

    #[test]
    fn well_formed_rejects_bad_characters_and_underscores() {
        assert!(!well_formed("TEST_lower", "TEST_"));
        assert!(!well_formed("TEST_Mixed", "TEST_"));
        assert!(!well_formed("TEST_A-B", "TEST_"));
        assert!(!well_formed("TEST__DOUBLE", "TEST_"));
        assert!(!well_formed("TEST_TRAILING_", "TEST_"));
        assert!(!well_formed("_TEST_A", "_TEST_"));
    }
}
