//! Standard-schema interop backend.
//!
//! This module lets any third-party validator participate in environment
//! parsing by implementing the small `StandardSchema` contract. It is the
//! counterpart of the native backend for consumers who already have a
//! validation library: build a `StandardEnv` from per-variable validators
//! and parse, with the same all-errors-at-once reporting.
//!
//! The module deliberately has no dependency on the native backend - it
//! compiles with `--no-default-features`, so standard-only consumers take
//! zero weight from the schema DSL machinery.
//!
//! # Example
//!
//! ```ignore
//! struct Port;
//!
//! impl StandardSchema for Port {
//!     fn validate(&self, value: Option<&str>) -> Result<Value, Vec<StandardIssue>> {
//!         let raw = value.ok_or_else(|| vec![StandardIssue::new("is required")])?;
//!         raw.parse::<u16>()
//!             .map(|p| Value::Integer(p as i64))
//!             .map_err(|_| vec![StandardIssue::new("must be a port number")])
//!     }
//! }
//!
//! let values = StandardEnv::builder()
//!     .var("PORT", Port)
//!     .build()
//!     .parse_with(&env)?;
//! ```

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use stillwater::Validation;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::{EnvError, EnvErrors, EnvValidation};
use crate::validator::{EnvValidator, EnvValues, UndeclaredKeys};
use crate::value::Value;

/// One issue reported by a standard validator.
///
/// `path` is relative to the variable being validated; the adapter
/// prepends the variable name when mapping into `EnvError`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardIssue {
    /// Path segments inside the validated value (empty for the root).
    pub path: Vec<String>,
    /// Human-readable failure description.
    pub message: String,
}

impl StandardIssue {
    /// Create a root-level issue.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Create an issue at a nested path.
    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

/// The interop contract for third-party validators.
///
/// Implementations receive the raw variable value (`None` when the
/// variable is unset) and either produce the parsed output value or a
/// list of issues. The contract is synchronous by construction; arkenv
/// does not support asynchronous validators.
pub trait StandardSchema: Send + Sync {
    /// Validate one variable's raw value.
    fn validate(&self, value: Option<&str>) -> Result<Value, Vec<StandardIssue>>;
}

impl<F> StandardSchema for F
where
    F: Fn(Option<&str>) -> Result<Value, Vec<StandardIssue>> + Send + Sync,
{
    fn validate(&self, value: Option<&str>) -> Result<Value, Vec<StandardIssue>> {
        self(value)
    }
}

/// An environment schema whose every variable is checked by a standard
/// validator.
pub struct StandardEnv {
    fields: BTreeMap<String, Box<dyn StandardSchema>>,
    on_undeclared: UndeclaredKeys,
}

impl StandardEnv {
    /// Create a builder.
    pub fn builder() -> StandardEnvBuilder {
        StandardEnvBuilder::new()
    }

    /// Parse the process environment.
    pub fn parse(&self) -> Result<EnvValues, EnvErrors> {
        self.parse_with(&ProcessEnv::new())
    }

    /// Parse the given environment source.
    pub fn parse_with(&self, env: &dyn EnvSource) -> Result<EnvValues, EnvErrors> {
        match self.validate(env) {
            Validation::Success(values) => Ok(values),
            Validation::Failure(errors) => Err(errors),
        }
    }

    /// Parse and deserialize into a typed configuration struct.
    pub fn parse_as<T: DeserializeOwned>(&self) -> Result<T, EnvErrors> {
        self.parse()?.deserialize()
    }

    /// Parse the given environment source and deserialize.
    pub fn parse_as_with<T: DeserializeOwned>(&self, env: &dyn EnvSource) -> Result<T, EnvErrors> {
        self.parse_with(env)?.deserialize()
    }
}

impl EnvValidator for StandardEnv {
    fn validate(&self, env: &dyn EnvSource) -> EnvValidation<EnvValues> {
        let mut values = EnvValues::empty();
        let mut errors = Vec::new();

        for (name, schema) in &self.fields {
            let raw = env.get(name);
            match schema.validate(raw.as_deref()) {
                Ok(value) => values.insert(name.clone(), value),
                Err(issues) => {
                    for issue in issues {
                        let path = if issue.path.is_empty() {
                            name.clone()
                        } else {
                            format!("{}.{}", name, issue.path.join("."))
                        };
                        errors.push(EnvError::validation(path, issue.message));
                    }
                }
            }
        }

        apply_undeclared_policy(
            self.on_undeclared,
            env,
            |k| self.fields.contains_key(k),
            &mut values,
            &mut errors,
        );

        match EnvErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(values),
        }
    }
}

/// Builder for `StandardEnv`.
pub struct StandardEnvBuilder {
    fields: BTreeMap<String, Box<dyn StandardSchema>>,
    on_undeclared: UndeclaredKeys,
}

impl StandardEnvBuilder {
    fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            on_undeclared: UndeclaredKeys::default(),
        }
    }

    /// Declare a variable checked by the given validator.
    pub fn var(mut self, name: impl Into<String>, schema: impl StandardSchema + 'static) -> Self {
        self.fields.insert(name.into(), Box::new(schema));
        self
    }

    /// Set the undeclared-key policy (default: `Delete`).
    pub fn on_undeclared(mut self, policy: UndeclaredKeys) -> Self {
        self.on_undeclared = policy;
        self
    }

    /// Finish the schema.
    pub fn build(self) -> StandardEnv {
        StandardEnv {
            fields: self.fields,
            on_undeclared: self.on_undeclared,
        }
    }
}

impl Default for StandardEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared undeclared-key handling for both backends.
///
/// Keys are visited in sorted order so rejection output is deterministic
/// regardless of the source's iteration order.
pub(crate) fn apply_undeclared_policy(
    policy: UndeclaredKeys,
    env: &dyn EnvSource,
    declared: impl Fn(&str) -> bool,
    values: &mut EnvValues,
    errors: &mut Vec<EnvError>,
) {
    if policy == UndeclaredKeys::Delete {
        return;
    }

    let mut vars = env.vars();
    vars.sort();

    for (key, value) in vars {
        if declared(&key) {
            continue;
        }
        match policy {
            UndeclaredKeys::Ignore => values.insert(key, Value::String(value)),
            UndeclaredKeys::Reject => errors.push(EnvError::Undeclared { key }),
            UndeclaredKeys::Delete => unreachable!(),
        }
    }
}
