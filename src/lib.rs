// Allow large error types - detailed validation errors are expected
#![allow(clippy::result_large_err)]

//! Arkenv: typesafe environment variable validation.
//!
//! Arkenv validates a flat map of string-valued environment variables
//! against a schema and produces a validated, type-coerced output, or a
//! structured error covering every failing variable at once.
//!
//! # Core Concepts
//!
//! - **Error Accumulation**: find ALL bad variables, not just the first one
//! - **Best-Effort Coercion**: `"8080"` becomes `8080` before the strict
//!   check runs; blanks and garbage stay strings and fail loudly
//! - **Keyword Types**: `number.port`, `string.host`, `string.boolean`
//! - **Testable I/O**: dependency injection via the `EnvSource` trait
//! - **Type Safety**: deserialize the validated table into your own struct
//!
//! # Quick Start
//!
//! ```ignore
//! use arkenv::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct AppConfig {
//!     #[serde(rename = "PORT")]
//!     port: u16,
//!     #[serde(rename = "HOST")]
//!     host: String,
//! }
//!
//! fn main() -> Result<(), EnvErrors> {
//!     let config: AppConfig = arkenv::schema()
//!         .var("PORT", "number.port")
//!         .var("HOST", "string.host")
//!         .build()?
//!         .parse_as()?;
//!
//!     println!("Running on {}:{}", config.host, config.port);
//!     Ok(())
//! }
//! ```
//!
//! # Schema Definitions
//!
//! Variables are declared with short DSL strings:
//!
//! ```text
//! "string"              "number"            "boolean"
//! "number.port"         "string.host"       "string.boolean"
//! "number >= 18"        "0 <= number <= 10" "number % 2"
//! "'dev' | 'prod'"      "string[]"          "number = 8080"
//! ```
//!
//! A trailing `?` on the variable name marks it optional
//! (`.var("DEBUG?", "boolean")`), and nested mappings are declared with
//! `.nested("DB", |db| ...)` and satisfied by JSON-valued variables.
//!
//! # Coercion
//!
//! Environment values are always strings; with coercion enabled (the
//! default) numeric and boolean leaves accept coercible strings and
//! re-validate the original constraint afterwards. Coercion is
//! best-effort and never invents values: blank strings do not become 0,
//! and only the exact strings `"true"`/`"false"` become booleans (the
//! richer `string.boolean` keyword accepts `1/0/yes/no/on/off`).
//!
//! # Standard Validators
//!
//! The [`standard`] module lets third-party validators drive parsing
//! through the small `StandardSchema` contract, with the same
//! all-errors-at-once reporting. It never touches the native backend:
//! building with `--no-default-features` keeps only the standard entry
//! point and drops the schema DSL machinery entirely.
//!
//! # Module Structure
//!
//! - [`prelude`]: convenient re-exports for common usage
//! - [`parse`]: `EnvSchema` and its builder (the native entry point)
//! - [`schema`]: schema IR, DSL, keyword types, coercion morphs
//! - [`standard`]: standard-validator interop entry point
//! - [`error`]: `EnvError`, `EnvErrors`, `EnvValidation`
//! - [`validator`]: the adapter contract and the validated output table
//! - [`mod@env`]: `EnvSource` trait, `ProcessEnv`, `MockEnv`
//! - [`pretty`]: colorized error rendering

pub mod env;
pub mod error;
pub mod pretty;
pub mod prelude;
pub mod standard;
pub mod validator;
pub mod value;

#[cfg(feature = "native")]
pub mod parse;
#[cfg(feature = "native")]
pub mod schema;

// Re-exports for convenience
pub use env::{EnvSource, MockEnv, ProcessEnv};
pub use error::{EnvError, EnvErrors, EnvValidation, EnvValidationExt, DEFAULT_HEADER};
pub use pretty::{ColorOption, PrettyPrintOptions};
pub use validator::{EnvValidator, EnvValues, UndeclaredKeys};
pub use value::Value;

#[cfg(feature = "native")]
pub use parse::{EnvSchema, EnvSchemaBuilder, FieldDef};
#[cfg(feature = "native")]
pub use schema::{coerce, coerce_with, ArrayFormat, Schema};

// Re-export stillwater types that are commonly used
pub use stillwater::{NonEmptyVec, Semigroup, Validation};

/// Start building an environment schema.
///
/// Shorthand for [`EnvSchema::builder()`].
#[cfg(feature = "native")]
pub fn schema() -> EnvSchemaBuilder {
    EnvSchema::builder()
}
