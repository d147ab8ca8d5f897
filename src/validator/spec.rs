//! Raw validator specifications
//!
//! A field's validator may be declared as:
//! - a function `(&Value) -> Result<Value, ValidationError>`
//! - a primitive kind tag
//! - a one-element sequence meaning "array of <inner>"

use std::fmt;
use std::sync::Arc;

use super::errors::{InvalidValidatorSpec, ValidationError};
use super::kind::PrimitiveKind;
use crate::value::Value;

/// Canonical validator: accepts a raw value and returns the typed value.
pub type ValidatorFn = Arc<dyn Fn(&Value) -> Result<Value, ValidationError> + Send + Sync>;

#[derive(Clone)]
pub enum ValidatorSpec {
    /// Author-supplied validator, used as is
    Func(ValidatorFn),
    /// Strict type check against a primitive kind
    Kind(PrimitiveKind),
    /// Sequence spec; only the one-element form is valid
    Sequence(Vec<ValidatorSpec>),
}

impl ValidatorSpec {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        ValidatorSpec::Func(Arc::new(f))
    }

    /// "Array of `inner`".
    pub fn array_of(inner: impl Into<ValidatorSpec>) -> Self {
        ValidatorSpec::Sequence(vec![inner.into()])
    }

    /// Parses a declarative spec: a kind name such as `"number"`, or a JSON
    /// array of specs.
    pub fn from_json(field: &str, raw: &serde_json::Value) -> Result<Self, InvalidValidatorSpec> {
        match raw {
            serde_json::Value::String(name) => PrimitiveKind::from_name(name)
                .map(ValidatorSpec::Kind)
                .ok_or_else(|| {
                    InvalidValidatorSpec::new(field, format!("unknown primitive kind '{}'", name))
                }),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| ValidatorSpec::from_json(field, item))
                .collect::<Result<Vec<_>, _>>()
                .map(ValidatorSpec::Sequence),
            other => Err(InvalidValidatorSpec::new(
                field,
                format!("unsupported validator shape '{}'", json_shape(other)),
            )),
        }
    }
}

impl From<PrimitiveKind> for ValidatorSpec {
    fn from(kind: PrimitiveKind) -> Self {
        ValidatorSpec::Kind(kind)
    }
}

impl From<ValidatorFn> for ValidatorSpec {
    fn from(f: ValidatorFn) -> Self {
        ValidatorSpec::Func(f)
    }
}

impl From<Vec<ValidatorSpec>> for ValidatorSpec {
    fn from(items: Vec<ValidatorSpec>) -> Self {
        ValidatorSpec::Sequence(items)
    }
}

impl fmt::Debug for ValidatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorSpec::Func(_) => f.write_str("Func(..)"),
            ValidatorSpec::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            ValidatorSpec::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

fn json_shape(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
