//! Terminal error types for the repair engine.

use thiserror::Error;

use crate::failure::ParseFailure;

/// Errors that end a repair invocation.
///
/// Retries happen only inside the repair loop; callers see either a
/// validated URI or exactly one of these. Each variant carries the working
/// string and attempt count at the moment of failure so callers can tell
/// how far the engine got.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepairError {
    /// The attempt budget ran out before the validator accepted.
    ///
    /// `working` is the string produced by the final edit, which the
    /// budget prevented re-validating.
    #[error("gave up after {attempts} repair attempts; last failure: {last_failure}")]
    ExhaustedAttempts {
        /// Working string after the final applied edit.
        working: String,
        /// Number of edits applied, equal to the configured budget.
        attempts: usize,
        /// The validation failure that triggered the final edit.
        last_failure: ParseFailure,
    },

    /// The failure had no usable category, or no classifier claimed it.
    #[error("no classifier recognized the failure after {attempts} repair attempts: {failure}")]
    Unclassifiable {
        /// Working string the validator rejected.
        working: String,
        /// Number of edits applied before the unrecognized failure.
        attempts: usize,
        /// The failure nothing claimed.
        failure: ParseFailure,
    },

    /// An illegal character whose code point exceeds what a single-byte
    /// percent escape can express.
    ///
    /// Distinct from [`RepairError::Unclassifiable`] so callers can tell
    /// "this character is unsupported" from "this failure shape is
    /// unrecognized". No multi-byte encoding is guessed.
    #[error(
        "character '{character}' at index {index} cannot be expressed as a two-digit percent escape"
    )]
    UnsupportedEscapeWidth {
        /// The character that does not fit a `%xx` escape.
        character: char,
        /// Character offset of `character` in the working string.
        index: usize,
        /// Working string at the time of the failure.
        working: String,
    },
}

/// A specialized `Result` type for repair operations.
pub type Result<T> = std::result::Result<T, RepairError>;
