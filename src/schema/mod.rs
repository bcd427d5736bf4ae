//! Native schema backend: the introspectable schema IR.
//!
//! Schemas are represented as a small tagged-variant tree that the
//! coercion transformer can walk to find numeric/boolean leaves, and that
//! the checker walks to validate coerced values. DSL strings compile into
//! this IR (see [`dsl`]), keyword types live in [`keywords`], and the
//! coercion morphs and transformer in [`coerce`].

pub mod coerce;
pub mod dsl;
pub mod keywords;

pub use coerce::{coerce, coerce_with, ArrayFormat, Coercion};

use std::collections::BTreeMap;

use stillwater::Validation;

use crate::error::{EnvError, EnvErrors, EnvValidation, EnvValidationExt};
use crate::value::Value;

/// A schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A string, optionally constrained
    String(StringSchema),
    /// A number, optionally constrained
    Number(NumberSchema),
    /// The strict boolean type (only `true`/`false` values)
    Boolean,
    /// The rich boolean keyword (`string.boolean`): parses
    /// true/1/yes/on and false/0/no/off case-insensitively
    BoolKeyword,
    /// A union of string literals (`'dev' | 'prod'`)
    Literals(Vec<String>),
    /// An array with a single element type
    Array(Box<Schema>),
    /// A nested object
    Object(ObjectSchema),
    /// A union of schemas, checked in declaration order
    Union(Vec<Schema>),
    /// A coercion morph piped into the underlying schema
    Coerced(Coercion, Box<Schema>),
}

/// String constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringConstraint {
    /// A syntactically valid IP address or the literal `localhost`
    Host,
}

/// A string schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringSchema {
    pub constraint: Option<StringConstraint>,
}

/// An inclusive or exclusive numeric bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

impl Bound {
    /// Inclusive bound.
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    /// Exclusive bound.
    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// A number schema: integer flag, bounds, divisor, and an optional
/// keyword message override (a single combined failure description).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberSchema {
    pub integer: bool,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub divisor: Option<i64>,
    pub expected: Option<&'static str>,
}

impl NumberSchema {
    fn has_constraints(&self) -> bool {
        self.integer
            || self.min.is_some()
            || self.max.is_some()
            || self.divisor.is_some()
            || self.expected.is_some()
    }

    /// Check a numeric value against every constraint.
    ///
    /// `fract` is the fractional part of the value (always 0 for values
    /// that arrived as integers).
    fn accepts(&self, v: f64, fract: f64) -> bool {
        if v.is_nan() {
            return !self.has_constraints();
        }
        if self.integer && fract != 0.0 {
            return false;
        }
        if let Some(min) = self.min {
            let ok = if min.exclusive { v > min.value } else { v >= min.value };
            if !ok {
                return false;
            }
        }
        if let Some(max) = self.max {
            let ok = if max.exclusive { v < max.value } else { v <= max.value };
            if !ok {
                return false;
            }
        }
        if let Some(d) = self.divisor {
            if fract != 0.0 || (v as i64) % d != 0 {
                return false;
            }
        }
        true
    }

    fn describe(&self) -> String {
        if let Some(expected) = self.expected {
            return expected.to_string();
        }
        let mut out = if self.integer {
            "an integer".to_string()
        } else {
            "a number".to_string()
        };
        if let Some(min) = self.min {
            let word = if min.exclusive { "more than" } else { "at least" };
            out.push_str(&format!(" {} {}", word, min.value));
        }
        if let Some(max) = self.max {
            let word = if max.exclusive { "less than" } else { "at most" };
            out.push_str(&format!(" {} {}", word, max.value));
        }
        if let Some(d) = self.divisor {
            out.push_str(&format!(" divisible by {}", d));
        }
        out
    }
}

/// A named object field: value schema, optionality, and default.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub schema: Schema,
    pub optional: bool,
    pub default: Option<Value>,
}

impl Field {
    /// A required field.
    pub fn required(schema: Schema) -> Self {
        Self {
            schema,
            optional: false,
            default: None,
        }
    }

    /// An optional field.
    pub fn optional(schema: Schema) -> Self {
        Self {
            schema,
            optional: true,
            default: None,
        }
    }

    /// Attach a default, applied when the key is absent.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A nested object schema: an ordered map of named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, Field>,
}

impl ObjectSchema {
    /// Create an empty object schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field.
    pub fn insert(&mut self, name: impl Into<String>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Check if a field is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    /// Rebuild with every field's value schema mapped through `f`,
    /// preserving optionality markers and defaults.
    pub fn map_values(self, mut f: impl FnMut(Schema) -> Schema) -> Self {
        Self {
            fields: self
                .fields
                .into_iter()
                .map(|(name, field)| {
                    (
                        name,
                        Field {
                            schema: f(field.schema),
                            optional: field.optional,
                            default: field.default,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Validate a table against this object schema.
    ///
    /// Declared fields are checked (with defaults applied and optional
    /// absences skipped); keys the schema does not declare are dropped.
    pub fn check_table(
        &self,
        mut table: BTreeMap<String, Value>,
        path: &str,
    ) -> EnvValidation<Value> {
        let mut out = BTreeMap::new();
        let mut errors = Vec::new();

        for (name, field) in &self.fields {
            let child = join_path(path, name);
            match table.remove(name) {
                Some(value) => match field.schema.check(value, &child) {
                    Validation::Success(value) => {
                        out.insert(name.clone(), value);
                    }
                    Validation::Failure(errs) => errors.extend(errs),
                },
                None => {
                    if let Some(default) = &field.default {
                        out.insert(name.clone(), default.clone());
                    } else if !field.optional {
                        errors.push(EnvError::missing(child));
                    }
                }
            }
        }

        match EnvErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(Value::Table(out)),
        }
    }
}

impl Schema {
    /// An unconstrained string.
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    /// An unconstrained number.
    pub fn number() -> Self {
        Schema::Number(NumberSchema::default())
    }

    /// An integer.
    pub fn integer() -> Self {
        Schema::Number(NumberSchema {
            integer: true,
            ..Default::default()
        })
    }

    /// The strict boolean.
    pub fn boolean() -> Self {
        Schema::Boolean
    }

    /// A union of string literals.
    pub fn literals<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::Literals(values.into_iter().map(Into::into).collect())
    }

    /// An array of the given element schema.
    pub fn array(element: Schema) -> Self {
        Schema::Array(Box::new(element))
    }

    /// Compile a DSL definition into a schema.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let port = Schema::parse("number.port")?;
    /// let mode = Schema::parse("'dev' | 'prod'")?;
    /// ```
    pub fn parse(def: &str) -> Result<Schema, EnvError> {
        dsl::parse_type(def).map_err(|message| EnvError::definition(def, message))
    }

    /// Human-readable description of what this schema accepts, used in
    /// `must be ... (was ...)` messages.
    pub fn expected(&self) -> String {
        match self {
            Schema::String(s) => match &s.constraint {
                None => "a string".to_string(),
                Some(StringConstraint::Host) => "an IP address or \"localhost\"".to_string(),
            },
            Schema::Number(n) => n.describe(),
            Schema::Boolean => "a boolean".to_string(),
            Schema::BoolKeyword => {
                "a boolean value (true, false, 1, 0, yes, no, on, off)".to_string()
            }
            Schema::Literals(lits) => lits
                .iter()
                .map(|l| format!("\"{}\"", l))
                .collect::<Vec<_>>()
                .join(" or "),
            Schema::Array(_) => "an array".to_string(),
            Schema::Object(_) => "an object".to_string(),
            Schema::Union(branches) => branches
                .iter()
                .map(Schema::expected)
                .collect::<Vec<_>>()
                .join(" or "),
            Schema::Coerced(_, inner) => inner.expected(),
        }
    }

    /// Validate a value against this schema.
    ///
    /// Coercion morphs run first where the tree carries them; the strict
    /// check always re-validates the post-coercion value, so constraint
    /// failures report what the value became (`was NaN`) or, when
    /// coercion changed nothing, the original string.
    pub fn check(&self, value: Value, path: &str) -> EnvValidation<Value> {
        match self {
            Schema::Coerced(coercion, inner) => inner.check(coercion.apply(value), path),

            Schema::String(s) => match value {
                Value::String(v) => match &s.constraint {
                    None => Validation::Success(Value::String(v)),
                    Some(StringConstraint::Host) => {
                        if keywords::is_valid_host(&v) {
                            Validation::Success(Value::String(v))
                        } else {
                            self.type_error(path, &Value::String(v))
                        }
                    }
                },
                other => self.type_error(path, &other),
            },

            Schema::Number(n) => match value {
                Value::Integer(i) => {
                    if n.accepts(i as f64, 0.0) {
                        Validation::Success(Value::Integer(i))
                    } else {
                        self.type_error(path, &Value::Integer(i))
                    }
                }
                Value::Float(f) => {
                    if n.accepts(f, f.fract()) {
                        Validation::Success(Value::Float(f))
                    } else {
                        self.type_error(path, &Value::Float(f))
                    }
                }
                other => self.type_error(path, &other),
            },

            Schema::Boolean => match value {
                Value::Bool(b) => Validation::Success(Value::Bool(b)),
                other => self.type_error(path, &other),
            },

            Schema::BoolKeyword => match value {
                Value::Bool(b) => Validation::Success(Value::Bool(b)),
                Value::String(s) => match parse_rich_boolean(&s) {
                    Some(b) => Validation::Success(Value::Bool(b)),
                    None => self.type_error(path, &Value::String(s)),
                },
                other => self.type_error(path, &other),
            },

            Schema::Literals(lits) => match value {
                Value::String(v) if lits.contains(&v) => Validation::Success(Value::String(v)),
                other => self.type_error(path, &other),
            },

            Schema::Array(element) => match value {
                Value::Array(items) => {
                    let checks: Vec<EnvValidation<Value>> = items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| element.check(item, &format!("{}[{}]", path, i)))
                        .collect();
                    Validation::all_vec(checks).map(Value::Array)
                }
                other => self.type_error(path, &other),
            },

            Schema::Object(obj) => match value {
                Value::Table(table) => obj.check_table(table, path),
                other => self.type_error(path, &other),
            },

            Schema::Union(branches) => {
                for branch in branches {
                    if let Validation::Success(v) = branch.check(value.clone(), path) {
                        return Validation::Success(v);
                    }
                }
                self.type_error(path, &value)
            }
        }
    }

    fn type_error(&self, path: &str, actual: &Value) -> EnvValidation<Value> {
        EnvValidation::fail_with(EnvError::validation(
            path,
            format!("must be {} (was {})", self.expected(), actual.describe()),
        ))
    }
}

/// Parse the rich boolean keyword's accepted spellings.
fn parse_rich_boolean(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Join a parent path and a field name with a dot.
pub(crate) fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
