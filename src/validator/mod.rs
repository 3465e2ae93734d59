//! URI validation: the validator contract and the bundled strict checker.
//!
//! The repair engine drives anything implementing [`Validate`]. The
//! bundled [`Rfc3986Validator`] enforces the RFC 3986 grammar and reports
//! the first violation as a structured [`ParseFailure`](crate::failure::ParseFailure)
//! with a category and a character index, which is exactly what the
//! built-in classifiers need to construct a minimal edit.

mod rfc3986;
mod uri;

pub use rfc3986::Rfc3986Validator;
pub use uri::Uri;

use crate::failure::ParseFailure;

/// A strict URI validator.
///
/// Implementations check a candidate string against their grammar and
/// either return the parsed [`Uri`] or a [`ParseFailure`] describing the
/// first violation.
///
/// # Contract
///
/// A failure's `index`, when present, must be a valid 0-based character
/// offset into the candidate string given to *this* call: the repair
/// loop re-validates an edited copy from scratch every iteration, so
/// offsets into earlier candidates are meaningless. A validator that
/// cannot supply a usable category and index must report
/// [`FailureCategory::Uncategorized`](crate::failure::FailureCategory::Uncategorized);
/// the engine treats such failures as unrepairable rather than guessing.
pub trait Validate {
    /// Validate `candidate`, returning the parsed URI or the first
    /// grammar violation.
    fn validate(&self, candidate: &str) -> Result<Uri, ParseFailure>;
}
