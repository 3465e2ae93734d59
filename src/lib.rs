//! # urigrit
//!
//! Minimal-edit repair of syntactically invalid URIs.
//!
//! Plenty of real-world URLs (sent by browsers, ad platforms, legacy
//! servers) violate the strict RFC 3986 grammar in ways URI parsers
//! refuse to accept, yet the remote server expects byte-identical
//! reproduction wherever possible. This crate converts such a string
//! into the closest string a strict validator accepts, basing every fix
//! directly on the validation failure itself so that no byte outside the
//! failure site is touched.
//!
//! The core is the repair loop, bounded by an attempt budget: validate,
//! classify the failure, apply the minimal corrective edit, validate
//! again. Two failure shapes are repairable out of the box:
//!
//! - an illegal character in the path, query, or fragment is replaced by
//!   its two-digit percent escape (`^` becomes `%5e`);
//! - a `%` that does not start a valid escape pair is replaced by `%25`.
//!
//! Anything else fails loudly: the engine never guesses.
//!
//! ## Example
//!
//! ```rust,ignore
//! use urigrit::repair;
//!
//! let uri = repair("http://finance.yahoo.com/q/h?s=^IXIC")?;
//! assert_eq!(uri.as_str(), "http://finance.yahoo.com/q/h?s=%5eIXIC");
//! assert_eq!(uri.query(), Some("s=%5eIXIC"));
//! ```
//!
//! Configured engines swap the validator, reorder classifiers, or shrink
//! the budget:
//!
//! ```rust,ignore
//! use urigrit::prelude::*;
//!
//! let engine = RepairEngineBuilder::new().max_attempts(10).build()?;
//! let uri = engine.repair("http://localhost/?q=some%2fthing%else")?;
//! assert_eq!(uri.as_str(), "http://localhost/?q=some%2fthing%25else");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod failure;
pub mod repair;
pub mod validator;

pub use repair::repair;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::error::RepairError;
    pub use crate::failure::{Component, FailureCategory, ParseFailure};
    pub use crate::repair::{
        repair, BuilderError, Classifier, EditOutcome, IllegalCharacterClassifier,
        MalformedEscapeClassifier, RepairEngine, RepairEngineBuilder, DEFAULT_MAX_ATTEMPTS,
    };
    pub use crate::validator::{Rfc3986Validator, Uri, Validate};
}
