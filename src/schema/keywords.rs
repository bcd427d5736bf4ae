//! Custom keyword types: `number.port`, `string.host`, `string.boolean`.
//!
//! Keyword schemas are compiled once, on first use, and memoized
//! process-wide. All call sites go through the [`keywords`] accessor so
//! the initialize-or-reuse point is explicit.

use std::net::IpAddr;
use std::sync::OnceLock;

use super::{Bound, NumberSchema, Schema, StringConstraint, StringSchema};

/// The compiled keyword registry.
#[derive(Debug, Clone)]
pub struct Keywords {
    /// `number.port`: an integer between 0 and 65535
    pub port: Schema,
    /// `string.host`: an IP address or the literal `localhost`
    pub host: Schema,
    /// `string.boolean`: the rich case-insensitive boolean spellings
    pub boolean: Schema,
}

impl Keywords {
    fn compile() -> Self {
        Self {
            port: Schema::Number(NumberSchema {
                integer: true,
                min: Some(Bound::inclusive(0.0)),
                max: Some(Bound::inclusive(65535.0)),
                divisor: None,
                expected: Some("an integer between 0 and 65535"),
            }),
            host: Schema::String(StringSchema {
                constraint: Some(StringConstraint::Host),
            }),
            boolean: Schema::BoolKeyword,
        }
    }
}

/// Access the keyword registry, compiling it on first use.
pub fn keywords() -> &'static Keywords {
    static REGISTRY: OnceLock<Keywords> = OnceLock::new();
    REGISTRY.get_or_init(Keywords::compile)
}

/// Check whether a string is a syntactically valid host: an IP address
/// (v4 or v6) or the literal `localhost`.
pub fn is_valid_host(raw: &str) -> bool {
    raw == "localhost" || raw.parse::<IpAddr>().is_ok()
}
