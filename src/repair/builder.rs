//! Builder for configuring a [`RepairEngine`].

use thiserror::Error;

use super::classifier::Classifier;
use super::{default_classifiers, RepairEngine, DEFAULT_MAX_ATTEMPTS};
use crate::validator::{Rfc3986Validator, Validate};

/// Error type for builder validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// The attempt budget was set to zero, which would forbid even the
    /// first validation.
    #[error("Attempt budget must be at least 1. Use .max_attempts() to set it.")]
    ZeroAttemptBudget,
    /// Every classifier was removed; the engine could never repair
    /// anything.
    #[error("At least one classifier is required. Use .classifier() to add one.")]
    NoClassifiers,
}

/// Fluent configuration of a [`RepairEngine`].
///
/// Starts from the defaults (strict RFC 3986 validator, the two built-in
/// classifiers, a budget of [`DEFAULT_MAX_ATTEMPTS`]); each method
/// overrides one piece. Classifier order is priority order: the first
/// classifier that claims a failure fires.
///
/// # Example
///
/// ```rust,ignore
/// use urigrit::prelude::*;
///
/// let engine = RepairEngineBuilder::new()
///     .max_attempts(5)
///     .build()?;
/// ```
pub struct RepairEngineBuilder<V: Validate = Rfc3986Validator> {
    validator: V,
    classifiers: Vec<Box<dyn Classifier>>,
    max_attempts: usize,
}

impl RepairEngineBuilder<Rfc3986Validator> {
    /// Create a builder preloaded with the defaults.
    pub fn new() -> Self {
        RepairEngineBuilder {
            validator: Rfc3986Validator,
            classifiers: default_classifiers(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for RepairEngineBuilder<Rfc3986Validator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Validate> RepairEngineBuilder<V> {
    /// Replace the validator the engine drives.
    pub fn validator<W: Validate>(self, validator: W) -> RepairEngineBuilder<W> {
        RepairEngineBuilder {
            validator,
            classifiers: self.classifiers,
            max_attempts: self.max_attempts,
        }
    }

    /// Set the attempt budget (the "grit": how many corrective edits the
    /// engine tolerates before giving up).
    ///
    /// Test suites exercise the exhaustion path by setting this low.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Append a classifier at the end of the priority order.
    pub fn classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifiers.push(Box::new(classifier));
        self
    }

    /// Remove all classifiers, including the built-ins, so the priority
    /// order can be rebuilt from scratch with [`Self::classifier`].
    pub fn clear_classifiers(mut self) -> Self {
        self.classifiers.clear();
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the budget is zero or the classifier list is
    /// empty.
    pub fn build(self) -> Result<RepairEngine<V>, BuilderError> {
        if self.max_attempts == 0 {
            return Err(BuilderError::ZeroAttemptBudget);
        }
        if self.classifiers.is_empty() {
            return Err(BuilderError::NoClassifiers);
        }
        Ok(RepairEngine {
            validator: self.validator,
            classifiers: self.classifiers,
            max_attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::IllegalCharacterClassifier;

    #[test]
    fn test_builder_defaults() {
        let engine = RepairEngineBuilder::new().build().unwrap();
        assert_eq!(engine.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(
            engine.classifier_names(),
            vec!["illegal-character", "malformed-escape"]
        );
    }

    #[test]
    fn test_builder_zero_budget_rejected() {
        let result = RepairEngineBuilder::new().max_attempts(0).build();
        assert_eq!(result.unwrap_err(), BuilderError::ZeroAttemptBudget);
    }

    #[test]
    fn test_builder_empty_classifiers_rejected() {
        let result = RepairEngineBuilder::new().clear_classifiers().build();
        assert_eq!(result.unwrap_err(), BuilderError::NoClassifiers);
    }

    #[test]
    fn test_builder_custom_order() {
        let engine = RepairEngineBuilder::new()
            .clear_classifiers()
            .classifier(IllegalCharacterClassifier)
            .build()
            .unwrap();
        assert_eq!(engine.classifier_names(), vec!["illegal-character"]);
    }

    #[test]
    fn test_builder_error_display() {
        assert!(BuilderError::ZeroAttemptBudget.to_string().contains("budget"));
        assert!(BuilderError::NoClassifiers.to_string().contains("classifier"));
    }
}
