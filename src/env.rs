//! EnvSource trait for testable environment access.
//!
//! This module abstracts environment variable access behind the
//! `EnvSource` trait, enabling dependency injection for testing. The
//! library only ever reads through this trait; it never mutates the
//! process environment.

use std::collections::HashMap;
use std::sync::RwLock;

/// Read-only access to an environment variable table.
///
/// # Example
///
/// ```ignore
/// // Production
/// let values = schema.parse()?;                 // Uses ProcessEnv
///
/// // Testing
/// let env = MockEnv::new().with_var("PORT", "8080");
/// let values = schema.parse_with(&env)?;
/// ```
pub trait EnvSource: Send + Sync {
    /// Get a variable by name. Returns `None` if the variable is not set.
    fn get(&self, name: &str) -> Option<String>;

    /// Get all variables as (name, value) pairs.
    ///
    /// Used by the undeclared-key policies, which need to see keys the
    /// schema does not mention.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Production source backed by the process environment.
///
/// This is a zero-cost abstraction - both methods are simple wrappers
/// around std functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Create a new process-environment source.
    pub fn new() -> Self {
        Self
    }
}

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }
}

/// Mock source for testing schema parsing without touching the process
/// environment.
///
/// # Example
///
/// ```
/// use arkenv::env::{EnvSource, MockEnv};
///
/// let env = MockEnv::new()
///     .with_var("PORT", "8080")
///     .with_var("HOST", "localhost");
///
/// assert_eq!(env.get("PORT"), Some("8080".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MockEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn with_var(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.write().unwrap().insert(name.into(), value.into());
        self
    }

    /// Set multiple variables from an iterator.
    pub fn with_vars<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = self.vars.write().unwrap();
        for (k, v) in vars {
            table.insert(k.into(), v.into());
        }
        drop(table);
        self
    }

    /// Update a variable after creation.
    ///
    /// Useful for tests that change the environment between parses.
    pub fn set_var(&self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.write().unwrap().insert(name.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove_var(&self, name: &str) {
        self.vars.write().unwrap().remove(name);
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.read().unwrap().get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
