//! Primitive kind tags
//!
//! The closed set of shorthand validators. Each kind is a strict runtime
//! type check; no coercion is ever applied.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Integer or floating point
    Number,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
}

impl PrimitiveKind {
    /// Returns the kind name used in declarative schemas.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "number",
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    /// Phrase used in validation messages ("must be a number").
    pub fn expectation(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "a number",
            PrimitiveKind::String => "a string",
            PrimitiveKind::Boolean => "a boolean",
        }
    }

    /// Resolves a kind name, accepting constructor-style capitalization.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "number" | "Number" => Some(PrimitiveKind::Number),
            "string" | "String" => Some(PrimitiveKind::String),
            "boolean" | "Boolean" | "bool" => Some(PrimitiveKind::Boolean),
            _ => None,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveKind::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            PrimitiveKind::String => matches!(value, Value::String(_)),
            PrimitiveKind::Boolean => matches!(value, Value::Bool(_)),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
