//! Structured validation failures.
//!
//! A [`ParseFailure`] is the contract between a validator and the repair
//! engine: a machine-readable category, an optional character index into
//! the rejected string, and a human-readable message. Classifiers dispatch
//! on the category and index only; the message exists for diagnostics and
//! is never pattern-matched.

use std::fmt;

/// The URI component in which an illegal character was found.
///
/// Only the three components the repair engine knows how to fix appear
/// here. Illegal characters elsewhere (scheme, authority) are reported as
/// [`FailureCategory::Uncategorized`] and are unrepairable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// The hierarchical path.
    Path,
    /// The query, between `?` and `#`.
    Query,
    /// The fragment, after `#`.
    Fragment,
}

impl Component {
    /// Lowercase component name as it appears in failure messages.
    pub fn name(self) -> &'static str {
        match self {
            Component::Path => "path",
            Component::Query => "query",
            Component::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// A character outside the allowed set of a path, query, or fragment.
    IllegalCharacter(Component),
    /// A `%` that is not followed by two hexadecimal digits.
    MalformedEscapePair,
    /// Any failure the validator cannot pin to a repairable shape.
    Uncategorized,
}

/// A structured parse failure produced by a validator.
///
/// Invariant: when `index` is present it is a valid 0-based character
/// offset into the string that produced the failure (`index < char
/// count`). A validator that cannot guarantee this must report the
/// failure as [`FailureCategory::Uncategorized`] with no index instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    category: FailureCategory,
    index: Option<usize>,
    message: String,
}

impl ParseFailure {
    /// Create a failure from raw parts.
    ///
    /// Prefer the shape-specific constructors below; this exists for
    /// custom [`Validate`](crate::validator::Validate) implementations
    /// whose failure shapes the built-ins do not cover.
    pub fn new(
        category: FailureCategory,
        index: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            index,
            message: message.into(),
        }
    }

    /// An illegal character in `component` at character offset `index` of
    /// `input`.
    pub fn illegal_character(component: Component, index: usize, input: &str) -> Self {
        debug_assert!(index < input.chars().count());
        Self {
            category: FailureCategory::IllegalCharacter(component),
            index: Some(index),
            message: format!("Illegal character in {component} at index {index}: {input}"),
        }
    }

    /// A `%` at character offset `index` of `input` that does not start a
    /// valid two-hex-digit escape.
    pub fn malformed_escape(index: usize, input: &str) -> Self {
        debug_assert!(index < input.chars().count());
        Self {
            category: FailureCategory::MalformedEscapePair,
            index: Some(index),
            message: format!("Malformed escape pair at index {index}: {input}"),
        }
    }

    /// An unrepairable failure with no useful location.
    pub fn uncategorized(message: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Uncategorized,
            index: None,
            message: message.into(),
        }
    }

    /// An unrepairable failure at a known character offset, e.g. an
    /// illegal character in a component the engine has no fix for.
    pub fn uncategorized_at(what: &str, index: usize, input: &str) -> Self {
        debug_assert!(index < input.chars().count());
        Self {
            category: FailureCategory::Uncategorized,
            index: Some(index),
            message: format!("{what} at index {index}: {input}"),
        }
    }

    /// The failure category classifiers dispatch on.
    pub fn category(&self) -> FailureCategory {
        self.category
    }

    /// Character offset into the rejected string, when known.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Human-readable description, for diagnostics only.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseFailure {}
