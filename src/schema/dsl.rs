//! The schema definition DSL.
//!
//! Definitions are short strings compiled into the schema IR:
//!
//! ```text
//! "string"                  plain keywords
//! "number.port"             keyword types (see keywords module)
//! "number >= 18"            constrained numbers
//! "0 <= number <= 65535"    double-bounded numbers
//! "number % 2"              divisor constraints
//! "'dev' | 'prod'"          string-literal unions
//! "string[]"                arrays
//! "number = 8080"           defaults, applied when the variable is absent
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::keywords::keywords;
use super::{Bound, NumberSchema, Schema};
use crate::value::Value;

/// A parsed definition: the schema plus an optional default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDef {
    pub schema: Schema,
    pub default: Option<Value>,
}

/// Parse a full definition, including a trailing ` = default` clause.
pub fn parse_definition(def: &str) -> Result<ParsedDef, String> {
    let (type_part, default_part) = match find_default_split(def) {
        Some(at) => (&def[..at], Some(&def[at + 3..])),
        None => (def, None),
    };

    let schema = parse_type(type_part)?;
    let default = default_part.map(parse_default_literal).transpose()?;

    Ok(ParsedDef { schema, default })
}

/// Parse a type expression (no default clause) into a schema.
pub fn parse_type(def: &str) -> Result<Schema, String> {
    let branches = split_union(def)?;
    if branches.len() == 1 {
        return parse_branch(&branches[0]);
    }

    let parsed: Vec<Schema> = branches
        .iter()
        .map(|b| parse_branch(b))
        .collect::<Result<_, _>>()?;

    // a union of string literals collapses into one literal set
    if parsed.iter().all(|s| matches!(s, Schema::Literals(_))) {
        let literals = parsed
            .into_iter()
            .flat_map(|s| match s {
                Schema::Literals(lits) => lits,
                _ => unreachable!(),
            })
            .collect();
        return Ok(Schema::Literals(literals));
    }
    Ok(Schema::Union(parsed))
}

/// Split a definition on `|` outside quoted literals.
fn split_union(def: &str) -> Result<Vec<String>, String> {
    let mut branches = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in def.chars() {
        match ch {
            '\'' => {
                in_quote = !in_quote;
                current.push(ch);
            }
            '|' if !in_quote => {
                branches.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if in_quote {
        return Err(format!("unterminated string literal in {:?}", def));
    }
    branches.push(current.trim().to_string());

    if branches.iter().any(String::is_empty) {
        return Err(format!("empty union branch in {:?}", def));
    }
    Ok(branches)
}

/// Parse one union branch: a base type with optional `[]` suffixes.
fn parse_branch(branch: &str) -> Result<Schema, String> {
    let mut base = branch.trim();
    let mut array_depth = 0;
    while let Some(stripped) = base.strip_suffix("[]") {
        array_depth += 1;
        base = stripped.trim_end();
    }

    let mut schema = parse_base(base)?;
    for _ in 0..array_depth {
        schema = Schema::array(schema);
    }
    Ok(schema)
}

fn parse_base(base: &str) -> Result<Schema, String> {
    match base {
        "string" => return Ok(Schema::string()),
        "number" => return Ok(Schema::number()),
        "integer" => return Ok(Schema::integer()),
        "boolean" => return Ok(Schema::boolean()),
        "number.port" => return Ok(keywords().port.clone()),
        "string.host" => return Ok(keywords().host.clone()),
        "string.boolean" => return Ok(keywords().boolean.clone()),
        _ => {}
    }

    if let Some(inner) = base.strip_prefix('\'') {
        let inner = inner
            .strip_suffix('\'')
            .ok_or_else(|| format!("unterminated string literal in {:?}", base))?;
        return Ok(Schema::Literals(vec![inner.to_string()]));
    }

    if let Some(captures) = constraint_re().captures(base) {
        return parse_constraint(base, &captures);
    }

    Err(format!(
        "unknown type {:?}; expected a keyword (string, number, integer, boolean, \
         number.port, string.host, string.boolean), a quoted literal like 'dev', \
         a constraint like \"number >= 1\", or a union of those",
        base
    ))
}

/// Constraint grammar over numbers, compiled on first use.
fn constraint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(-?\d+(?:\.\d+)?)\s*(<=|<)\s*)?(number|integer)(?:\s*(<=|<|>=|>|%)\s*(-?\d+(?:\.\d+)?))?$",
        )
        .expect("constraint grammar is valid")
    })
}

fn parse_constraint(base: &str, captures: &regex::Captures<'_>) -> Result<Schema, String> {
    let mut schema = NumberSchema {
        integer: &captures[3] == "integer",
        ..Default::default()
    };

    if let (Some(value), Some(op)) = (captures.get(1), captures.get(2)) {
        let value: f64 = value.as_str().parse().map_err(|_| bad_bound(base))?;
        schema.min = Some(Bound {
            value,
            exclusive: op.as_str() == "<",
        });
    }

    if let (Some(op), Some(value)) = (captures.get(4), captures.get(5)) {
        match op.as_str() {
            "%" => {
                let divisor: i64 = value
                    .as_str()
                    .parse()
                    .map_err(|_| format!("divisor must be an integer in {:?}", base))?;
                if divisor == 0 {
                    return Err(format!("divisor must be non-zero in {:?}", base));
                }
                schema.divisor = Some(divisor);
            }
            op => {
                let value: f64 = value.as_str().parse().map_err(|_| bad_bound(base))?;
                let bound = Bound {
                    value,
                    exclusive: matches!(op, "<" | ">"),
                };
                match op {
                    ">=" | ">" => {
                        if schema.min.is_some() {
                            return Err(format!("conflicting lower bounds in {:?}", base));
                        }
                        schema.min = Some(bound);
                    }
                    "<=" | "<" => schema.max = Some(bound),
                    _ => unreachable!(),
                }
            }
        }
    }

    if schema.min.is_none() && schema.max.is_none() && schema.divisor.is_none() {
        // bare "number"/"integer" is handled by the keyword table
        return Err(format!("constraint in {:?} has no bound", base));
    }

    if let (Some(min), Some(max)) = (schema.min, schema.max) {
        if min.value > max.value {
            return Err(format!("bounds are out of order in {:?}", base));
        }
    }

    Ok(Schema::Number(schema))
}

fn bad_bound(base: &str) -> String {
    format!("bound is not a number in {:?}", base)
}

/// Find the byte offset of a top-level ` = ` default separator.
///
/// The three-character pattern cannot match inside `<=`/`>=` (no space
/// before the `=`), so only quote state needs tracking.
fn find_default_split(def: &str) -> Option<usize> {
    let bytes = def.as_bytes();
    let mut in_quote = false;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\'' {
            in_quote = !in_quote;
        }
        if !in_quote && bytes[i..].starts_with(b" = ") {
            return Some(i);
        }
    }
    None
}

/// Parse a default literal: quoted string, boolean, integer, or float.
fn parse_default_literal(raw: &str) -> Result<Value, String> {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('\'') {
        let inner = inner
            .strip_suffix('\'')
            .ok_or_else(|| format!("unterminated default literal {:?}", raw))?;
        return Ok(Value::String(inner.to_string()));
    }
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Ok(Value::Float(f));
    }
    Err(format!(
        "unparseable default {:?}; expected a quoted string, boolean, or number",
        raw
    ))
}
