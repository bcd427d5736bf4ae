//! Coercion morphs and the schema-tree coercion transformer.
//!
//! Environment variables arrive as strings; morphs rewrite them into the
//! types the schema expects before the strict check runs. Every morph is
//! a pure, total function: "could not coerce" is signalled by returning
//! the input unchanged, so the downstream check fails with a useful
//! `(was "...")` message instead of a silent wrong value.

use crate::value::Value;

use super::{ObjectSchema, Schema};

/// How a string value targeted at an array-typed schema node is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayFormat {
    /// Split on commas, trimming each element (default)
    #[default]
    Comma,
    /// Parse the whole value as a JSON array
    Json,
}

/// A coercion step inserted into the schema tree by the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Best-effort string-to-number
    Number,
    /// Strict `"true"`/`"false"` string-to-boolean
    Boolean,
    /// JSON-object/array parsing for strings starting with `{` or `[`
    Json,
    /// Comma splitting for array targets
    SplitComma,
    /// JSON-array parsing for array targets
    SplitJson,
}

impl Coercion {
    /// Apply this coercion to a value.
    pub fn apply(&self, value: Value) -> Value {
        match self {
            Coercion::Number => coerce_number(value),
            Coercion::Boolean => coerce_boolean(value),
            Coercion::Json => coerce_json(value),
            Coercion::SplitComma => split_comma(value),
            Coercion::SplitJson => split_json(value),
        }
    }
}

/// Best-effort string-to-number coercion.
///
/// Numbers pass through unchanged. Strings are trimmed; blank strings
/// stay strings (blank must never become 0), the literal `NaN` becomes
/// the numeric NaN, and anything that fails to parse is returned
/// unchanged for the strict check to report.
pub fn coerce_number(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Value::String(s);
            }
            if trimmed == "NaN" {
                return Value::Float(f64::NAN);
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::Integer(i);
            }
            match trimmed.parse::<f64>() {
                // f64::from_str accepts "nan" in any casing; only the
                // literal above may coerce to NaN
                Ok(f) if !f.is_nan() => Value::Float(f),
                _ => Value::String(s),
            }
        }
        other => other,
    }
}

/// Strict string-to-boolean coercion: exact-match on `"true"`/`"false"`.
///
/// Deliberately narrower than the `string.boolean` keyword, which owns
/// the rich case-insensitive spelling set.
pub fn coerce_boolean(value: Value) -> Value {
    match value {
        Value::String(s) => match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        other => other,
    }
}

/// Best-effort JSON coercion for strings that look like objects/arrays.
pub fn coerce_json(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                match serde_json::from_str::<serde_json::Value>(trimmed) {
                    Ok(json) => Value::from_json(json),
                    Err(_) => Value::String(s),
                }
            } else {
                Value::String(s)
            }
        }
        other => other,
    }
}

/// Split a non-empty string on commas into an array of trimmed strings.
///
/// Empty strings pass through unchanged (they fail the array check
/// rather than silently becoming an empty list).
fn split_comma(value: Value) -> Value {
    match value {
        Value::String(s) if !s.is_empty() => Value::Array(
            s.split(',')
                .map(|e| Value::String(e.trim().to_string()))
                .collect(),
        ),
        other => other,
    }
}

/// Parse a string as a JSON array; anything else passes through.
fn split_json(value: Value) -> Value {
    match coerce_json(value) {
        Value::Array(items) => Value::Array(items),
        other => other,
    }
}

/// Transform a schema so its numeric/boolean leaves (and the root)
/// additionally accept coercible strings, using the default comma array
/// format.
pub fn coerce(schema: Schema) -> Schema {
    coerce_with(schema, ArrayFormat::Comma)
}

/// Transform a schema with an explicit array format.
///
/// Numeric leaves are piped through number coercion, boolean leaves
/// through the strict boolean morph, object leaves through JSON parsing
/// (recursing into their fields), and array leaves through the
/// configured splitter (recursing into the element type). Strings,
/// literal unions, unions, and already-coerced nodes are left unchanged;
/// the transform is idempotent.
pub fn coerce_with(schema: Schema, format: ArrayFormat) -> Schema {
    match schema {
        Schema::Number(_) => wrap(Coercion::Number, schema),
        Schema::Boolean => wrap(Coercion::Boolean, schema),
        Schema::Object(obj) => wrap(
            Coercion::Json,
            Schema::Object(coerce_object(obj, format)),
        ),
        Schema::Array(element) => {
            let split = match format {
                ArrayFormat::Comma => Coercion::SplitComma,
                ArrayFormat::Json => Coercion::SplitJson,
            };
            wrap(split, Schema::Array(Box::new(coerce_with(*element, format))))
        }
        Schema::Coerced(..) => schema,
        other => other,
    }
}

/// Transform every field of an object schema, preserving optionality and
/// defaults.
pub(crate) fn coerce_object(obj: ObjectSchema, format: ArrayFormat) -> ObjectSchema {
    obj.map_values(|schema| coerce_with(schema, format))
}

fn wrap(coercion: Coercion, schema: Schema) -> Schema {
    Schema::Coerced(coercion, Box::new(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Bound, Field, NumberSchema};
    use std::collections::BTreeMap;

    #[test]
    fn test_coerce_number_parses_integers_and_floats() {
        assert_eq!(
            coerce_number(Value::String("8080".to_string())),
            Value::Integer(8080)
        );
        assert_eq!(
            coerce_number(Value::String("-3".to_string())),
            Value::Integer(-3)
        );
        assert_eq!(
            coerce_number(Value::String("2.5".to_string())),
            Value::Float(2.5)
        );
        assert_eq!(
            coerce_number(Value::String(" 42 ".to_string())),
            Value::Integer(42)
        );
    }

    #[test]
    fn test_coerce_number_blank_stays_string() {
        assert_eq!(
            coerce_number(Value::String("".to_string())),
            Value::String("".to_string())
        );
        assert_eq!(
            coerce_number(Value::String("   ".to_string())),
            Value::String("   ".to_string())
        );
    }

    #[test]
    fn test_coerce_number_nan_literal_only() {
        match coerce_number(Value::String("NaN".to_string())) {
            Value::Float(f) => assert!(f.is_nan()),
            other => panic!("expected NaN float, got {:?}", other),
        }
        // other casings stay strings
        assert_eq!(
            coerce_number(Value::String("nan".to_string())),
            Value::String("nan".to_string())
        );
        assert_eq!(
            coerce_number(Value::String("abc".to_string())),
            Value::String("abc".to_string())
        );
    }

    #[test]
    fn test_coerce_number_passes_non_strings() {
        assert_eq!(coerce_number(Value::Integer(7)), Value::Integer(7));
        assert_eq!(coerce_number(Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_coerce_boolean_exact_match_only() {
        assert_eq!(
            coerce_boolean(Value::String("true".to_string())),
            Value::Bool(true)
        );
        assert_eq!(
            coerce_boolean(Value::String("false".to_string())),
            Value::Bool(false)
        );
        for unchanged in ["True", "TRUE", "1", "yes", " true"] {
            assert_eq!(
                coerce_boolean(Value::String(unchanged.to_string())),
                Value::String(unchanged.to_string()),
                "{:?} must pass through",
                unchanged
            );
        }
    }

    #[test]
    fn test_coerce_json_objects_and_arrays() {
        let out = coerce_json(Value::String(r#"{"a": 1}"#.to_string()));
        let table = out.as_table().expect("expected a table");
        assert_eq!(table.get("a"), Some(&Value::Integer(1)));

        assert_eq!(
            coerce_json(Value::String("[1, 2]".to_string())),
            Value::Array(vec![Value::Integer(1), Value::Integer(2)])
        );
    }

    #[test]
    fn test_coerce_json_non_json_unchanged() {
        assert_eq!(
            coerce_json(Value::String("plain".to_string())),
            Value::String("plain".to_string())
        );
        // looks like JSON but is not: unchanged, never an error
        assert_eq!(
            coerce_json(Value::String("{broken".to_string())),
            Value::String("{broken".to_string())
        );
    }

    #[test]
    fn test_split_comma() {
        assert_eq!(
            Coercion::SplitComma.apply(Value::String("a, b,c".to_string())),
            Value::Array(vec![
                Value::String("a".to_string()),
                Value::String("b".to_string()),
                Value::String("c".to_string()),
            ])
        );
        assert_eq!(
            Coercion::SplitComma.apply(Value::String("".to_string())),
            Value::String("".to_string())
        );
    }

    #[test]
    fn test_transformer_wraps_numeric_and_boolean_leaves() {
        assert_eq!(
            coerce(Schema::number()),
            Schema::Coerced(Coercion::Number, Box::new(Schema::number()))
        );
        assert_eq!(
            coerce(Schema::boolean()),
            Schema::Coerced(Coercion::Boolean, Box::new(Schema::Boolean))
        );
    }

    #[test]
    fn test_transformer_leaves_strings_and_unions_alone() {
        assert_eq!(coerce(Schema::string()), Schema::string());
        let union = Schema::Union(vec![Schema::number(), Schema::string()]);
        assert_eq!(coerce(union.clone()), union);
        let lits = Schema::literals(["dev", "prod"]);
        assert_eq!(coerce(lits.clone()), lits);
    }

    #[test]
    fn test_transformer_is_idempotent() {
        let once = coerce(Schema::number());
        assert_eq!(coerce(once.clone()), once);

        let mut obj = ObjectSchema::new();
        obj.insert("PORT", Field::required(Schema::number()));
        let once = coerce(Schema::Object(obj));
        assert_eq!(coerce(once.clone()), once);
    }

    #[test]
    fn test_transformer_preserves_constraints() {
        let bounded = Schema::Number(NumberSchema {
            min: Some(Bound::inclusive(10.0)),
            ..Default::default()
        });
        let coerced = coerce(bounded.clone());
        // "12" satisfies the bound after coercion
        assert!(coerced
            .check(Value::String("12".to_string()), "K")
            .is_success());
        // "9" coerces but still fails the original constraint
        assert!(coerced
            .check(Value::String("9".to_string()), "K")
            .is_failure());
        // already-numeric input behaves exactly like the uncoerced schema
        assert_eq!(
            coerced.check(Value::Integer(12), "K").is_success(),
            bounded.check(Value::Integer(12), "K").is_success()
        );
    }

    #[test]
    fn test_transformer_recurses_into_objects_and_arrays() {
        let mut inner = ObjectSchema::new();
        inner.insert("PORT", Field::required(Schema::number()));
        let schema = coerce(Schema::Object(inner));

        // a JSON string satisfies the object, with nested coercion
        let out = schema
            .check(Value::String(r#"{"PORT": "5432"}"#.to_string()), "DB");
        match out {
            stillwater::Validation::Success(Value::Table(t)) => {
                assert_eq!(t.get("PORT"), Some(&Value::Integer(5432)));
            }
            other => panic!("expected table, got {:?}", other),
        }

        let arr = coerce(Schema::array(Schema::number()));
        match arr.check(Value::String("1,2,3".to_string()), "NUMS") {
            stillwater::Validation::Success(Value::Array(items)) => {
                assert_eq!(
                    items,
                    vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
                );
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_json_array_format() {
        let arr = coerce_with(Schema::array(Schema::number()), ArrayFormat::Json);
        match arr.check(Value::String("[1, 2]".to_string()), "NUMS") {
            stillwater::Validation::Success(Value::Array(items)) => {
                assert_eq!(items, vec![Value::Integer(1), Value::Integer(2)]);
            }
            other => panic!("expected array, got {:?}", other),
        }
        // comma-form input is not an array under the json format
        assert!(arr.check(Value::String("1,2".to_string()), "NUMS").is_failure());
    }

    #[test]
    fn test_morphs_report_post_coercion_value() {
        let bounded = coerce(Schema::Number(NumberSchema {
            min: Some(Bound::inclusive(0.0)),
            ..Default::default()
        }));

        // coercion partially succeeded: message shows NaN
        match bounded.check(Value::String("NaN".to_string()), "K") {
            stillwater::Validation::Failure(e) => {
                assert!(e.first().to_string().contains("(was NaN)"));
            }
            _ => panic!("expected failure"),
        }

        // coercion did nothing: message shows the original string
        match bounded.check(Value::String("abc".to_string()), "K") {
            stillwater::Validation::Failure(e) => {
                assert!(e.first().to_string().contains("(was \"abc\")"));
            }
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn test_nested_table_direct_input_still_checked() {
        let mut inner = ObjectSchema::new();
        inner.insert("PORT", Field::required(Schema::number()));
        let schema = coerce(Schema::Object(inner));

        let mut table = BTreeMap::new();
        table.insert("PORT".to_string(), Value::Integer(1));
        assert!(schema.check(Value::Table(table), "DB").is_success());
    }
}
