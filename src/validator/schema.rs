//! Schema declarations and normalized validator maps

use std::collections::HashMap;
use std::fmt;

use super::errors::{InvalidValidatorSpec, ValidationError};
use super::normalizer::normalize_validator;
use super::spec::{ValidatorFn, ValidatorSpec};
use crate::value::Value;

/// Ordered mapping from field name to raw validator spec.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<(String, ValidatorSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Re-declaring replaces the spec in place.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<ValidatorSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<ValidatorSpec>) {
        let name = name.into();
        let spec = spec.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ValidatorSpec> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidatorSpec)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

impl<K: Into<String>, S: Into<ValidatorSpec>> FromIterator<(K, S)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, spec) in iter {
            schema.insert(name, spec);
        }
        schema
    }
}

/// Normalized validators in declaration order.
#[derive(Clone, Default)]
pub struct ValidatorMap {
    order: Vec<String>,
    validators: HashMap<String, ValidatorFn>,
}

impl ValidatorMap {
    pub fn get(&self, field: &str) -> Option<&ValidatorFn> {
        self.validators.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.validators.contains_key(field)
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Runs the field's validator. `None` if the field is not declared.
    pub fn validate(&self, field: &str, raw: &Value) -> Option<Result<Value, ValidationError>> {
        self.validators.get(field).map(|validator| validator(raw))
    }
}

impl fmt::Debug for ValidatorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorMap")
            .field("fields", &self.order)
            .finish()
    }
}

/// Normalizes every schema entry, failing on the first malformed one.
pub fn normalize_schema(schema: &Schema) -> Result<ValidatorMap, InvalidValidatorSpec> {
    let mut map = ValidatorMap::default();
    for (name, spec) in schema.iter() {
        let validator = normalize_validator(name, spec)?;
        map.order.push(name.to_string());
        map.validators.insert(name.to_string(), validator);
    }
    Ok(map)
}
