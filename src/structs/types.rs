//! Struct type definitions
//!
//! - `Policy`: Immutable or Mutable access after construction
//! - `Fields`: ordered field/value list used for defaults and overrides
//! - `PropertyDescriptor`: introspection record for one field

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// Mutation policy of a struct instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// No write ever succeeds; the record is deep-frozen.
    #[default]
    Immutable,
    /// Known fields may be reassigned, without re-validation.
    Mutable,
}

impl Policy {
    pub fn is_immutable(&self) -> bool {
        matches!(self, Policy::Immutable)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Immutable => "immutable",
            Policy::Mutable => "mutable",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered field-to-value list.
///
/// Used both for defaults (which declare the field set) and for partial
/// overrides. A `Value::Null` override means "keep the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, replacing an earlier entry in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(f, _)| f == field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a field list from a JSON object. Returns `None` for any other
    /// JSON shape.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Object(entries) => Some(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// Introspection record returned for a declared field.
///
/// Always reports a configurable, enumerable, writable data field, whatever
/// the instance policy; writes are still governed by the policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub configurable: bool,
    pub enumerable: bool,
    pub writable: bool,
    pub value: Value,
}

impl PropertyDescriptor {
    pub fn data(value: Value) -> Self {
        Self {
            configurable: true,
            enumerable: true,
            writable: true,
            value,
        }
    }
}
