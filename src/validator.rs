//! Validator adapter contract and the validated output table.
//!
//! Both backends (the native schema backend and the standard-schema
//! interop backend) implement the single `EnvValidator` contract and
//! normalize their results into `EnvValidation<EnvValues>`, so callers
//! and tooling never care which engine did the work.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::env::EnvSource;
use crate::error::{EnvError, EnvErrors, EnvValidation};
use crate::value::Value;

/// Policy for environment keys present in the source but not declared in
/// the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndeclaredKeys {
    /// Strip undeclared keys from the output (default)
    #[default]
    Delete,
    /// Pass undeclared keys through as raw strings
    Ignore,
    /// Fail validation, naming each undeclared key
    Reject,
}

/// The uniform validator contract.
///
/// Implementations collect every issue across every key into one
/// `EnvErrors` - never fail-fast, never partial success.
pub trait EnvValidator {
    /// Validate the given environment and produce the output table.
    fn validate(&self, env: &dyn EnvSource) -> EnvValidation<EnvValues>;
}

/// Validated, type-coerced output of a parse call.
///
/// Keys are variable names; values are the post-coercion `Value`s.
/// Iteration order is stable (sorted by key).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvValues {
    values: BTreeMap<String, Value>,
}

impl EnvValues {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Insert a value for a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Get a value by variable name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if a variable is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of variables in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (name, value) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Get all variable names.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Convert the table to a JSON object for serde deserialization.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Deserialize the table into a typed configuration struct.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct AppConfig {
    ///     PORT: u16,
    ///     HOST: String,
    /// }
    ///
    /// let config: AppConfig = schema.parse_with(&env)?.deserialize()?;
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, EnvErrors> {
        serde_json::from_value(self.to_json()).map_err(|e| {
            let message = e.to_string();

            // serde reports absent struct fields as `missing field `name``
            if message.contains("missing field") {
                if let Some(start) = message.find('`') {
                    if let Some(end) = message[start + 1..].find('`') {
                        let field = &message[start + 1..start + 1 + end];
                        return EnvErrors::single(EnvError::missing(field));
                    }
                }
            }

            EnvErrors::single(EnvError::validation("(root)", message))
        })
    }
}

impl IntoIterator for EnvValues {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
