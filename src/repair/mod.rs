//! The iterative repair loop.
//!
//! The engine drives a validator against a working copy of the input:
//! validate, classify the failure, apply the minimal corrective edit,
//! and validate again, until the validator accepts, the attempt budget
//! runs out, or a failure arrives that no classifier claims. Every
//! applied edit is re-checked by a fresh full parse rather than
//! compounding unchecked assumptions.
//!
//! By "fixing" a URI you are changing the bytes a downstream client puts
//! on the wire, so each edit is the minimum splice the failure itself
//! implicates and nothing more. Remote servers accept plenty of strings
//! a strict grammar rejects; the loop's job is to thread the string
//! through the grammar wall with the fewest possible changes, not to
//! canonicalize it.

mod builder;
mod classifier;

pub use builder::{BuilderError, RepairEngineBuilder};
pub use classifier::{
    Classifier, EditOutcome, IllegalCharacterClassifier, MalformedEscapeClassifier,
};

use std::fmt;

use tracing::{debug, trace};

use crate::error::RepairError;
use crate::failure::{FailureCategory, ParseFailure};
use crate::validator::{Rfc3986Validator, Uri, Validate};

/// Default number of corrective edits tolerated before giving up.
///
/// A safety bound, not a performance target: repair is one full
/// re-validation per attempt.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Repair a raw URI string with a default engine.
///
/// Convenience wrapper over [`RepairEngine::repair`] with the strict
/// RFC 3986 validator, the two built-in classifiers, and the default
/// attempt budget.
///
/// # Example
///
/// ```rust,ignore
/// let uri = urigrit::repair("http://finance.yahoo.com/q/h?s=^IXIC")?;
/// assert_eq!(uri.as_str(), "http://finance.yahoo.com/q/h?s=%5eIXIC");
/// ```
///
/// # Errors
///
/// Returns [`RepairError`] when the budget is exhausted, the failure is
/// unclassifiable, or an illegal character does not fit a single-byte
/// escape.
pub fn repair(raw: &str) -> Result<Uri, RepairError> {
    RepairEngine::new().repair(raw)
}

/// The repair engine: a validator, an ordered classifier list, and an
/// attempt budget.
///
/// The engine is immutable during [`RepairEngine::repair`]; all mutable
/// state is local to the invocation, so one engine may serve concurrent
/// callers.
///
/// # Type Parameters
///
/// - `V`: the validator driven by the loop (defaults to
///   [`Rfc3986Validator`])
///
/// # Example
///
/// ```rust,ignore
/// use urigrit::prelude::*;
///
/// let engine = RepairEngine::new();
/// let uri = engine.repair("http://localhost/?q={a b}")?;
/// assert_eq!(uri.as_str(), "http://localhost/?q=%7ba%20b%7d");
/// ```
pub struct RepairEngine<V: Validate = Rfc3986Validator> {
    validator: V,
    classifiers: Vec<Box<dyn Classifier>>,
    max_attempts: usize,
}

impl RepairEngine<Rfc3986Validator> {
    /// Create an engine with the default validator, classifiers, and
    /// budget.
    pub fn new() -> Self {
        RepairEngine {
            validator: Rfc3986Validator,
            classifiers: default_classifiers(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for RepairEngine<Rfc3986Validator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Validate> RepairEngine<V> {
    /// Create an engine around a custom validator, keeping the default
    /// classifiers and budget.
    pub fn with_validator(validator: V) -> Self {
        RepairEngine {
            validator,
            classifiers: default_classifiers(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// The configured attempt budget.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Classifier names in priority order.
    pub fn classifier_names(&self) -> Vec<&'static str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    /// Repair `raw` into a string the validator accepts, with the
    /// minimum edits the failures themselves implicate.
    ///
    /// Each iteration validates the whole working string from scratch;
    /// on failure, classifiers are tried in priority order and only the
    /// first match fires. The validator runs at most `max_attempts`
    /// times.
    ///
    /// # Errors
    ///
    /// - [`RepairError::ExhaustedAttempts`] when the budget runs out.
    /// - [`RepairError::Unclassifiable`] when the failure has no usable
    ///   category or no classifier claims it.
    /// - [`RepairError::UnsupportedEscapeWidth`] when an illegal
    ///   character's code point exceeds a two-digit escape.
    pub fn repair(&self, raw: &str) -> Result<Uri, RepairError> {
        let mut working = raw.to_owned();
        let mut attempts = 0usize;

        loop {
            let failure = match self.validator.validate(&working) {
                Ok(uri) => {
                    debug!(attempts, uri = uri.as_str(), "validator accepted");
                    return Ok(uri);
                }
                Err(failure) => failure,
            };
            debug!(
                attempts,
                category = ?failure.category(),
                index = ?failure.index(),
                "validation failed"
            );

            // A failure without a usable category cannot be repaired;
            // do not guess.
            if failure.category() == FailureCategory::Uncategorized {
                return Err(RepairError::Unclassifiable {
                    working,
                    attempts,
                    failure,
                });
            }

            match self.dispatch(&working, &failure)? {
                Some(next) => {
                    attempts += 1;
                    if attempts >= self.max_attempts {
                        return Err(RepairError::ExhaustedAttempts {
                            working: next,
                            attempts,
                            last_failure: failure,
                        });
                    }
                    working = next;
                }
                None => {
                    return Err(RepairError::Unclassifiable {
                        working,
                        attempts,
                        failure,
                    })
                }
            }
        }
    }

    /// Offer `failure` to each classifier in priority order.
    ///
    /// `Ok(None)` means nothing claimed it.
    fn dispatch(
        &self,
        working: &str,
        failure: &ParseFailure,
    ) -> Result<Option<String>, RepairError> {
        for classifier in &self.classifiers {
            match classifier.try_fix(working, failure)? {
                EditOutcome::Applied(next) => {
                    trace!(classifier = classifier.name(), edited = next.as_str(), "edit applied");
                    return Ok(Some(next));
                }
                EditOutcome::Declined => {}
            }
        }
        Ok(None)
    }
}

impl<V: Validate + fmt::Debug> fmt::Debug for RepairEngine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepairEngine")
            .field("validator", &self.validator)
            .field("classifiers", &self.classifier_names())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// The built-in classifiers in priority order.
fn default_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(IllegalCharacterClassifier),
        Box::new(MalformedEscapeClassifier),
    ]
}
