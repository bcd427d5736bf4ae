//! Convenient re-exports for common arkenv usage.
//!
//! # Quick Start
//!
//! ```ignore
//! use arkenv::prelude::*;
//!
//! let values = arkenv::schema()
//!     .var("PORT", "number.port")
//!     .var("HOST", "string.host")
//!     .build()?
//!     .parse()?;
//! ```

// ============================================================================
// Stillwater re-exports (core functional programming types)
// ============================================================================

/// Result type with error accumulation. `EnvValidation<T>` is the
/// arkenv-specific alias.
pub use stillwater::Validation;

/// Trait for combining values. `EnvErrors` implements this for error
/// accumulation.
pub use stillwater::Semigroup;

/// Guaranteed non-empty collection. Underlying type for `EnvErrors`.
pub use stillwater::NonEmptyVec;

// ============================================================================
// Error types
// ============================================================================

/// Individual validation or usage issue tied to one variable path.
pub use crate::error::EnvError;

/// Non-empty collection of errors. Implements `Semigroup` for
/// accumulation.
pub use crate::error::EnvErrors;

/// Type alias: `Validation<T, EnvErrors>`. The standard result type.
pub use crate::error::EnvValidation;

/// Extension trait for creating failing validations easily.
pub use crate::error::EnvValidationExt;

// ============================================================================
// Core types
// ============================================================================

/// Intermediate representation of an environment value.
pub use crate::value::Value;

/// The uniform validator contract implemented by both backends.
pub use crate::validator::EnvValidator;

/// Validated, type-coerced output of a parse call.
pub use crate::validator::EnvValues;

/// Policy for environment keys not declared in the schema.
pub use crate::validator::UndeclaredKeys;

// ============================================================================
// Environment access
// ============================================================================

/// Read-only environment access trait (dependency injection point).
pub use crate::env::EnvSource;

/// Mock environment for tests.
pub use crate::env::MockEnv;

/// Production environment source.
pub use crate::env::ProcessEnv;

// ============================================================================
// Native schema backend
// ============================================================================

/// A compiled environment schema, ready to parse.
#[cfg(feature = "native")]
pub use crate::parse::EnvSchema;

/// Builder for `EnvSchema`.
#[cfg(feature = "native")]
pub use crate::parse::EnvSchemaBuilder;

/// How array-typed variables are split from strings.
#[cfg(feature = "native")]
pub use crate::schema::ArrayFormat;

/// A schema node, buildable directly or compiled from a DSL string.
#[cfg(feature = "native")]
pub use crate::schema::Schema;

/// Transform a schema so numeric/boolean leaves accept coercible strings.
#[cfg(feature = "native")]
pub use crate::schema::{coerce, coerce_with};

// ============================================================================
// Pretty printing
// ============================================================================

/// Color output option for pretty printing.
pub use crate::pretty::ColorOption;

/// Options for pretty printing errors.
pub use crate::pretty::PrettyPrintOptions;
