//! Environment parsing orchestrator for the native schema backend.
//!
//! `EnvSchema` is built once from per-variable definitions (DSL strings,
//! pre-compiled schemas, or nested mappings), then parsed against any
//! `EnvSource`. One parse call reports every failing variable together.
//!
//! # Example
//!
//! ```ignore
//! let schema = arkenv::schema()
//!     .var("PORT", "number.port")
//!     .var("HOST", "string.host")
//!     .var("DEBUG?", "boolean")
//!     .nested("DB", |db| db.var("HOST", "string").var("PORT", "number"))
//!     .build()?;
//!
//! let values = schema.parse()?;
//! ```

use serde::de::DeserializeOwned;
use stillwater::Validation;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::{EnvError, EnvErrors, EnvValidation};
use crate::schema::coerce::coerce_object;
use crate::schema::dsl;
use crate::schema::{join_path, ArrayFormat, Field, ObjectSchema, Schema};
use crate::standard::apply_undeclared_policy;
use crate::validator::{EnvValidator, EnvValues, UndeclaredKeys};
use crate::value::Value;

/// A compiled environment schema, ready to parse.
#[derive(Debug, Clone)]
pub struct EnvSchema {
    root: ObjectSchema,
    on_undeclared: UndeclaredKeys,
}

impl EnvSchema {
    /// Create a builder.
    pub fn builder() -> EnvSchemaBuilder {
        EnvSchemaBuilder::new()
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

    /// Parse the process environment and deserialize into a typed struct.
    pub fn parse_as<T: DeserializeOwned>(&self) -> Result<T, EnvErrors> {
        self.parse()?.deserialize()
    }

    /// Parse the given environment source and deserialize.
    pub fn parse_as_with<T: DeserializeOwned>(&self, env: &dyn EnvSource) -> Result<T, EnvErrors> {
        self.parse_with(env)?.deserialize()
    }
}

impl EnvValidator for EnvSchema {
    fn validate(&self, env: &dyn EnvSource) -> EnvValidation<EnvValues> {
        let mut values = EnvValues::empty();
        let mut errors = Vec::new();

        for (name, field) in self.root.iter() {
            match env.get(name) {
                Some(raw) => match field.schema.check(Value::String(raw), name) {
                    Validation::Success(value) => values.insert(name.clone(), value),
                    Validation::Failure(errs) => errors.extend(errs),
                },
                None => {
                    if let Some(default) = &field.default {
                        values.insert(name.clone(), default.clone());
                    } else if !field.optional {
                        errors.push(EnvError::missing(name.clone()));
                    }
                }
            }
        }

        apply_undeclared_policy(
            self.on_undeclared,
            env,
            |k| self.root.contains(k),
            &mut values,
            &mut errors,
        );

        match EnvErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(values),
        }
    }
}

/// A per-variable definition accepted by the builder.
#[derive(Debug, Clone)]
pub enum FieldDef {
    /// A DSL string, compiled at `build()`
    Dsl(String),
    /// A pre-compiled schema
    Compiled(Schema),
    /// A nested mapping
    Nested(Vec<(String, FieldDef)>),
}

impl From<&str> for FieldDef {
    fn from(def: &str) -> Self {
        FieldDef::Dsl(def.to_string())
    }
}

impl From<String> for FieldDef {
    fn from(def: String) -> Self {
        FieldDef::Dsl(def)
    }
}

impl From<Schema> for FieldDef {
    fn from(schema: Schema) -> Self {
        FieldDef::Compiled(schema)
    }
}

/// Builder for `EnvSchema`.
///
/// A trailing `?` on a variable name marks it optional; defaults are
/// declared in the DSL (`"number = 8080"`).
#[derive(Debug, Clone)]
pub struct EnvSchemaBuilder {
    entries: Vec<(String, FieldDef)>,
    coerce: bool,
    array_format: ArrayFormat,
    on_undeclared: UndeclaredKeys,
}

impl EnvSchemaBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            coerce: true,
            array_format: ArrayFormat::default(),
            on_undeclared: UndeclaredKeys::default(),
        }
    }

    /// Declare a variable.
    pub fn var(mut self, name: impl Into<String>, def: impl Into<FieldDef>) -> Self {
        self.entries.push((name.into(), def.into()));
        self
    }

    /// Declare a nested mapping, validated from a JSON-valued variable.
    pub fn nested(
        mut self,
        name: impl Into<String>,
        f: impl FnOnce(EnvSchemaBuilder) -> EnvSchemaBuilder,
    ) -> Self {
        let sub = f(EnvSchemaBuilder::new());
        self.entries.push((name.into(), FieldDef::Nested(sub.entries)));
        self
    }

    /// Enable or disable string coercion (default: enabled).
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Set how array-typed variables are split from strings
    /// (default: `Comma`).
    pub fn array_format(mut self, format: ArrayFormat) -> Self {
        self.array_format = format;
        self
    }

    /// Set the undeclared-key policy (default: `Delete`).
    pub fn on_undeclared(mut self, policy: UndeclaredKeys) -> Self {
        self.on_undeclared = policy;
        self
    }

    /// Compile the schema.
    ///
    /// Definition problems (bad DSL, defaults that fail their own
    /// schema) are aggregated across all keys, like any other failure.
    pub fn build(self) -> Result<EnvSchema, EnvErrors> {
        let mut errors = Vec::new();
        let mut root = resolve_object(self.entries, "", &mut errors);

        if let Some(errors) = EnvErrors::from_vec(errors) {
            return Err(errors);
        }

        if self.coerce {
            root = coerce_object(root, self.array_format);
        }

        Ok(EnvSchema {
            root,
            on_undeclared: self.on_undeclared,
        })
    }
}

impl Default for EnvSchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve builder entries into an object schema, collecting definition
/// errors with full paths.
fn resolve_object(
    entries: Vec<(String, FieldDef)>,
    prefix: &str,
    errors: &mut Vec<EnvError>,
) -> ObjectSchema {
    let mut obj = ObjectSchema::new();

    for (key, def) in entries {
        let (name, optional) = split_optional(&key);
        let path = join_path(prefix, name);

        match def {
            FieldDef::Dsl(source) => match dsl::parse_definition(&source) {
                Ok(parsed) => {
                    if let Some(default) = &parsed.default {
                        if parsed.schema.check(default.clone(), &path).is_failure() {
                            errors.push(EnvError::definition(
                                &path,
                                format!(
                                    "default {} does not satisfy {}",
                                    default.describe(),
                                    parsed.schema.expected()
                                ),
                            ));
                            continue;
                        }
                    }
                    let mut field = Field {
                        schema: parsed.schema,
                        optional,
                        default: parsed.default,
                    };
                    if field.default.is_some() {
                        // a defaulted variable can never be missing
                        field.optional = true;
                    }
                    obj.insert(name, field);
                }
                Err(message) => errors.push(EnvError::definition(&path, message)),
            },
            FieldDef::Compiled(schema) => {
                let field = if optional {
                    Field::optional(schema)
                } else {
                    Field::required(schema)
                };
                obj.insert(name, field);
            }
            FieldDef::Nested(sub) => {
                let sub_obj = resolve_object(sub, &path, errors);
                let field = Field {
                    schema: Schema::Object(sub_obj),
                    optional,
                    default: None,
                };
                obj.insert(name, field);
            }
        }
    }

    obj
}

/// Strip a trailing `?` optionality marker from a variable name.
fn split_optional(key: &str) -> (&str, bool) {
    match key.strip_suffix('?') {
        Some(name) => (name, true),
        None => (key, false),
    }
}
