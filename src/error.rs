//! Error types for arkenv.
//!
//! This module provides the per-issue `EnvError` type and the non-empty
//! `EnvErrors` aggregate that integrates with stillwater's `Validation`
//! type and `Semigroup` trait. A single parse call reports every failing
//! variable together through one `EnvErrors` value.

use std::fmt;

use stillwater::{NonEmptyVec, Semigroup, Validation};

/// Default top-level message rendered above the issue list.
pub const DEFAULT_HEADER: &str = "Errors found while validating environment variables";

/// A single validation or usage issue, tied to one variable path.
///
/// Paths use dot/index notation for nested values (`DB.PORT`, `TAGS[2]`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// A variable value failed its schema check
    #[error("{path} {message}")]
    Validation { path: String, message: String },

    /// A required variable was not set
    #[error("{path} is required but was not set")]
    Missing { path: String },

    /// An undeclared variable was present under the `Reject` policy
    #[error("{key} was provided but is not declared in the schema")]
    Undeclared { key: String },

    /// The schema definition itself is invalid (caller misuse, reported
    /// from `build()` and never downgraded to a validation issue)
    #[error("invalid schema definition for {path}: {message}")]
    Definition { path: String, message: String },
}

impl EnvError {
    /// Create a validation issue, stripping a redundant leading path from
    /// the message so rendering never produces `PORT PORT must be ...`.
    ///
    /// Foreign validators sometimes embed the variable name in their own
    /// messages; the issue path is authoritative.
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        let mut message = message.into();
        if let Some(rest) = message.strip_prefix(&path) {
            if let Some(stripped) = rest.strip_prefix(' ') {
                message = stripped.to_string();
            }
        }
        EnvError::Validation { path, message }
    }

    /// Create a missing-variable issue.
    pub fn missing(path: impl Into<String>) -> Self {
        EnvError::Missing { path: path.into() }
    }

    /// Create a schema-definition issue.
    pub fn definition(path: impl Into<String>, message: impl Into<String>) -> Self {
        EnvError::Definition {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get the variable path this error relates to.
    pub fn path(&self) -> &str {
        match self {
            EnvError::Validation { path, .. } => path,
            EnvError::Missing { path } => path,
            EnvError::Undeclared { key } => key,
            EnvError::Definition { path, .. } => path,
        }
    }

    /// Check if this is a validation-stage error (as opposed to caller misuse).
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, EnvError::Definition { .. })
    }

    /// Get a suggestion for fixing this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            EnvError::Missing { path } => Some(format!("Set {} in your environment", path)),
            EnvError::Undeclared { key } => {
                Some(format!("Declare {} in the schema or remove it", key))
            }
            _ => None,
        }
    }
}

/// A non-empty collection of environment errors.
///
/// Uses `NonEmptyVec` from stillwater to guarantee at least one error
/// exists, and `Semigroup` to accumulate issues across variables.
#[derive(Debug, Clone)]
pub struct EnvErrors(pub NonEmptyVec<EnvError>);

impl EnvErrors {
    /// Create from a single error.
    pub fn single(error: EnvError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Create from a non-empty vec.
    pub fn from_nonempty(errors: NonEmptyVec<EnvError>) -> Self {
        Self(errors)
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(errors: Vec<EnvError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Get the first error (always exists).
    pub fn first(&self) -> &EnvError {
        self.0.head()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty (always false, but required for API consistency).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over errors in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvError> {
        self.0.iter()
    }
}

impl Semigroup for EnvErrors {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<EnvError> for EnvErrors {
    fn from(error: EnvError) -> Self {
        Self::single(error)
    }
}

impl IntoIterator for EnvErrors {
    type Item = EnvError;
    type IntoIter = std::vec::IntoIter<EnvError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for EnvErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DEFAULT_HEADER)?;
        for error in self.iter() {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnvErrors {}

/// The standard validation result type for arkenv.
///
/// `Validation` accumulates failures instead of short-circuiting, so one
/// parse reports every bad variable at once.
pub type EnvValidation<T> = Validation<T, EnvErrors>;

/// Extension trait for creating failing validations easily.
pub trait EnvValidationExt<T> {
    /// Create a failing validation with a single error.
    fn fail_with(error: EnvError) -> EnvValidation<T>;
}

impl<T> EnvValidationExt<T> for EnvValidation<T> {
    fn fail_with(error: EnvError) -> EnvValidation<T> {
        Validation::Failure(EnvErrors::single(error))
    }
}
