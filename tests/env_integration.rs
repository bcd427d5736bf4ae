//! Integration tests for end-to-end environment parsing.
//!
//! These tests exercise the full pipeline: DSL compilation, coercion
//! transform, validation, error accumulation, and typed deserialization,
//! all through `MockEnv` injection.

#![cfg(feature = "native")]

use arkenv::prelude::*;
use serde::Deserialize;

fn schema_port() -> EnvSchema {
    arkenv::schema().var("PORT", "number.port").build().unwrap()
}

#[test]
fn test_port_coerces_to_integer() {
    let env = MockEnv::new().with_var("PORT", "8080");
    let values = schema_port().parse_with(&env).unwrap();
    assert_eq!(values.get("PORT"), Some(&Value::Integer(8080)));
}

#[test]
fn test_port_out_of_range_names_the_variable() {
    let env = MockEnv::new().with_var("PORT", "99999");
    let errors = schema_port().parse_with(&env).unwrap_err();
    let rendered = errors.to_string();
    assert!(rendered.contains("PORT"));
    assert!(rendered.contains("an integer between 0 and 65535"));
    assert!(rendered.contains("99999"));
}

#[test]
fn test_host_keyword() {
    let schema = arkenv::schema().var("HOST", "string.host").build().unwrap();

    let env = MockEnv::new().with_var("HOST", "localhost");
    let values = schema.parse_with(&env).unwrap();
    assert_eq!(values.get("HOST"), Some(&Value::String("localhost".to_string())));

    let env = MockEnv::new().with_var("HOST", "192.168.0.1");
    assert!(schema.parse_with(&env).is_ok());

    let env = MockEnv::new().with_var("HOST", "not-a-host");
    let errors = schema.parse_with(&env).unwrap_err();
    assert!(errors.to_string().contains("HOST"));
}

#[test]
fn test_nested_json_object_with_numeric_coercion() {
    let env = MockEnv::new().with_var("DB", r#"{"HOST": "localhost", "PORT": "5432"}"#);

    let schema = arkenv::schema()
        .nested("DB", |db| db.var("HOST", "string").var("PORT", "number"))
        .build()
        .unwrap();

    let values = schema.parse_with(&env).unwrap();
    let db = values.get("DB").unwrap().as_table().unwrap();
    assert_eq!(db.get("HOST"), Some(&Value::String("localhost".to_string())));
    assert_eq!(db.get("PORT"), Some(&Value::Integer(5432)));
}

#[test]
fn test_blank_strings_never_become_zero() {
    let schema = arkenv::schema().var("COUNT", "number").build().unwrap();

    for blank in ["", "   ", "\t"] {
        let env = MockEnv::new().with_var("COUNT", blank);
        let errors = schema.parse_with(&env).unwrap_err();
        assert!(
            errors.to_string().contains("COUNT must be a number"),
            "blank {:?} must fail, not coerce to 0",
            blank
        );
    }
}

#[test]
fn test_boolean_morph_is_strict() {
    let schema = arkenv::schema().var("FLAG", "boolean").build().unwrap();

    let env = MockEnv::new().with_var("FLAG", "true");
    assert_eq!(
        schema.parse_with(&env).unwrap().get("FLAG"),
        Some(&Value::Bool(true))
    );

    let env = MockEnv::new().with_var("FLAG", "false");
    assert_eq!(
        schema.parse_with(&env).unwrap().get("FLAG"),
        Some(&Value::Bool(false))
    );

    // the morph path rejects everything else, including "1" and "yes"
    for raw in ["1", "yes", "True", "on"] {
        let env = MockEnv::new().with_var("FLAG", raw);
        assert!(
            schema.parse_with(&env).is_err(),
            "{:?} must fail the strict boolean",
            raw
        );
    }
}

#[test]
fn test_boolean_keyword_is_rich() {
    let schema = arkenv::schema()
        .var("FLAG", "string.boolean")
        .build()
        .unwrap();

    for (raw, expected) in [
        ("1", true),
        ("yes", true),
        ("ON", true),
        (" True ", true),
        ("0", false),
        ("no", false),
        ("off", false),
    ] {
        let env = MockEnv::new().with_var("FLAG", raw);
        assert_eq!(
            schema.parse_with(&env).unwrap().get("FLAG"),
            Some(&Value::Bool(expected)),
            "{:?} should parse as {}",
            raw,
            expected
        );
    }

    let env = MockEnv::new().with_var("FLAG", "maybe");
    let errors = schema.parse_with(&env).unwrap_err();
    assert!(errors
        .to_string()
        .contains("a boolean value (true, false, 1, 0, yes, no, on, off)"));
}

#[test]
fn test_error_aggregation_across_variables() {
    let env = MockEnv::new().with_var("A", "abc").with_var("B", "maybe");

    let schema = arkenv::schema()
        .var("A", "number")
        .var("B", "boolean")
        .build()
        .unwrap();

    let errors = schema.parse_with(&env).unwrap_err();
    assert_eq!(errors.len(), 2);
    let rendered = errors.to_string();
    assert!(rendered.contains("A must be a number (was \"abc\")"));
    assert!(rendered.contains("B must be a boolean (was \"maybe\")"));
}

#[test]
fn test_undeclared_key_policies() {
    let env = MockEnv::new().with_var("A", "x").with_var("B", "y");

    let delete = arkenv::schema().var("A", "string").build().unwrap();
    let values = delete.parse_with(&env).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values.get("A"), Some(&Value::String("x".to_string())));

    let ignore = arkenv::schema()
        .var("A", "string")
        .on_undeclared(UndeclaredKeys::Ignore)
        .build()
        .unwrap();
    let values = ignore.parse_with(&env).unwrap();
    assert_eq!(values.get("B"), Some(&Value::String("y".to_string())));

    let reject = arkenv::schema()
        .var("A", "string")
        .on_undeclared(UndeclaredKeys::Reject)
        .build()
        .unwrap();
    let errors = reject.parse_with(&env).unwrap_err();
    assert!(errors.to_string().contains("B"));
}

#[test]
fn test_rendered_error_format() {
    let env = MockEnv::new().with_var("PORT", "99999");
    let errors = schema_port().parse_with(&env).unwrap_err();

    let rendered = errors.to_string();
    let mut lines = rendered.lines();
    assert_eq!(
        lines.next(),
        Some("Errors found while validating environment variables")
    );
    assert_eq!(
        lines.next(),
        Some("  PORT must be an integer between 0 and 65535 (was 99999)")
    );
}

#[test]
fn test_typed_deserialization_end_to_end() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct AppConfig {
        #[serde(rename = "PORT")]
        port: u16,
        #[serde(rename = "HOST")]
        host: String,
        #[serde(rename = "DEBUG")]
        debug: Option<bool>,
        #[serde(rename = "TAGS")]
        tags: Vec<String>,
    }

    let env = MockEnv::new()
        .with_var("PORT", "8080")
        .with_var("HOST", "localhost")
        .with_var("TAGS", "web, api");

    let config: AppConfig = arkenv::schema()
        .var("PORT", "number.port")
        .var("HOST", "string.host")
        .var("DEBUG?", "boolean")
        .var("TAGS", "string[]")
        .build()
        .unwrap()
        .parse_as_with(&env)
        .unwrap();

    assert_eq!(
        config,
        AppConfig {
            port: 8080,
            host: "localhost".to_string(),
            debug: None,
            tags: vec!["web".to_string(), "api".to_string()],
        }
    );
}

#[test]
fn test_defaults_and_literal_unions() {
    let env = MockEnv::new();
    let schema = arkenv::schema()
        .var("MODE", "'dev' | 'prod' = 'dev'")
        .var("WORKERS", "number >= 1 = 4")
        .build()
        .unwrap();

    let values = schema.parse_with(&env).unwrap();
    assert_eq!(values.get("MODE"), Some(&Value::String("dev".to_string())));
    assert_eq!(values.get("WORKERS"), Some(&Value::Integer(4)));

    let env = MockEnv::new().with_var("WORKERS", "0");
    let errors = schema.parse_with(&env).unwrap_err();
    assert!(errors
        .to_string()
        .contains("WORKERS must be a number at least 1 (was 0)"));
}

#[test]
fn test_mutated_env_reparses() {
    let env = MockEnv::new().with_var("PORT", "8080");
    let schema = schema_port();

    assert!(schema.parse_with(&env).is_ok());

    env.set_var("PORT", "not-a-port");
    assert!(schema.parse_with(&env).is_err());

    env.remove_var("PORT");
    let errors = schema.parse_with(&env).unwrap_err();
    assert!(matches!(errors.first(), EnvError::Missing { path } if path == "PORT"));
}

#[test]
fn test_both_backends_render_identically() {
    use arkenv::standard::{StandardEnv, StandardIssue};

    // the same failure surfaced through the standard entry point renders
    // with the same header and indentation as the native one
    let native = schema_port()
        .parse_with(&MockEnv::new().with_var("PORT", "99999"))
        .unwrap_err();

    let standard = StandardEnv::builder()
        .var("PORT", |_: Option<&str>| -> Result<Value, Vec<StandardIssue>> {
            Err(vec![StandardIssue::new(
                "must be an integer between 0 and 65535 (was 99999)",
            )])
        })
        .build()
        .parse_with(&MockEnv::new())
        .unwrap_err();

    assert_eq!(native.to_string(), standard.to_string());
}
