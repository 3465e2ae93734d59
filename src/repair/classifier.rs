//! Failure classifiers and their corrective edits.
//!
//! A classifier recognizes one shape of validation failure and knows the
//! minimal edit for it. The engine offers each failure to its classifiers
//! in priority order; the first one that claims it produces the next
//! working string, and the loop re-validates from scratch.

use crate::error::RepairError;
use crate::failure::{FailureCategory, ParseFailure};

/// What a classifier did with a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The failure was claimed; the edited working string follows.
    Applied(String),
    /// The failure is not this classifier's shape; try the next one.
    Declined,
}

/// A handler for one shape of validation failure.
///
/// Implementations must be side-effect free: `try_fix` either declines or
/// returns a new string, and never mutates shared state, so one engine
/// can serve concurrent callers.
pub trait Classifier: Send + Sync {
    /// Short name used in trace events and `Debug` output.
    fn name(&self) -> &'static str;

    /// Offer `failure` to this classifier.
    ///
    /// Returns [`EditOutcome::Declined`] when the failure is not the
    /// shape this classifier handles. A fatal error is reserved for
    /// failures the classifier *does* claim but cannot fix soundly.
    fn try_fix(&self, working: &str, failure: &ParseFailure) -> Result<EditOutcome, RepairError>;
}

/// The character at char offset `index` and its byte range, when in bounds.
fn char_at(s: &str, index: usize) -> Option<(char, usize, usize)> {
    let (start, c) = s.char_indices().nth(index)?;
    Some((c, start, start + c.len_utf8()))
}

/// Percent-escapes a single illegal character in place.
///
/// Claims [`FailureCategory::IllegalCharacter`] failures carrying an
/// in-range index. The character at that index is replaced by its
/// two-lowercase-hex-digit escape; every other character is left
/// untouched. Code points above `0xff` do not fit a single-byte escape
/// and fail fatally rather than producing a corrupt one.
#[derive(Debug, Clone, Copy, Default)]
pub struct IllegalCharacterClassifier;

impl Classifier for IllegalCharacterClassifier {
    fn name(&self) -> &'static str {
        "illegal-character"
    }

    fn try_fix(&self, working: &str, failure: &ParseFailure) -> Result<EditOutcome, RepairError> {
        if !matches!(failure.category(), FailureCategory::IllegalCharacter(_)) {
            return Ok(EditOutcome::Declined);
        }
        let Some(index) = failure.index() else {
            return Ok(EditOutcome::Declined);
        };
        let Some((bad, start, end)) = char_at(working, index) else {
            return Ok(EditOutcome::Declined);
        };

        let code = bad as u32;
        if code > 0xff {
            return Err(RepairError::UnsupportedEscapeWidth {
                character: bad,
                index,
                working: working.to_owned(),
            });
        }

        let mut next = String::with_capacity(working.len() + 2);
        next.push_str(&working[..start]);
        next.push_str(&format!("%{code:02x}"));
        next.push_str(&working[end..]);
        Ok(EditOutcome::Applied(next))
    }
}

/// Escapes a stray `%` that does not start a valid escape pair.
///
/// Claims [`FailureCategory::MalformedEscapePair`] failures whose index
/// points at a literal `%`. That `%` is replaced by the three-character
/// sequence `%25`; no attempt is made to infer the intended escape length
/// or the validity of the following characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MalformedEscapeClassifier;

impl Classifier for MalformedEscapeClassifier {
    fn name(&self) -> &'static str {
        "malformed-escape"
    }

    fn try_fix(&self, working: &str, failure: &ParseFailure) -> Result<EditOutcome, RepairError> {
        if failure.category() != FailureCategory::MalformedEscapePair {
            return Ok(EditOutcome::Declined);
        }
        let Some(index) = failure.index() else {
            return Ok(EditOutcome::Declined);
        };
        let Some((target, start, end)) = char_at(working, index) else {
            return Ok(EditOutcome::Declined);
        };
        if target != '%' {
            return Ok(EditOutcome::Declined);
        }

        let mut next = String::with_capacity(working.len() + 2);
        next.push_str(&working[..start]);
        next.push_str("%25");
        next.push_str(&working[end..]);
        Ok(EditOutcome::Applied(next))
    }
}
