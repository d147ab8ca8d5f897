//! Declarative struct configuration
//!
//! A struct type can be declared as data instead of code:
//!
//! ```json
//! {
//!   "name": "SoilData",
//!   "policy": "mutable",
//!   "fields": [
//!     { "name": "row",  "validator": "number", "default": 0 },
//!     { "name": "tags", "validator": ["string"], "default": [] }
//!   ]
//! }
//! ```
//!
//! Callers supply the text; nothing here reads files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::{StructError, StructResult};
use super::types::{Fields, Policy};
use crate::validator::{Schema, ValidatorSpec};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructConfig {
    /// Type name reported by instances and errors
    pub name: String,
    /// Policy used by `StructDefinition::instantiate`
    #[serde(default)]
    pub policy: Policy,
    /// Field declarations, in declaration order
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Kind name or one-element array spec
    pub validator: serde_json::Value,
    #[serde(default)]
    pub default: serde_json::Value,
}

impl StructConfig {
    pub fn from_json_str(text: &str) -> StructResult<Self> {
        let config: StructConfig =
            serde_json::from_str(text).map_err(|e| StructError::InvalidConfig(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> StructResult<Self> {
        let config: StructConfig =
            serde_json::from_value(value).map_err(|e| StructError::InvalidConfig(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Parses every field's validator spec.
    pub fn schema(&self) -> StructResult<Schema> {
        let mut schema = Schema::new();
        for field in &self.fields {
            schema.insert(
                field.name.clone(),
                ValidatorSpec::from_json(&field.name, &field.validator)?,
            );
        }
        Ok(schema)
    }

    pub fn defaults(&self) -> Fields {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), Value::from(f.default.clone())))
            .collect()
    }

    fn check(&self) -> StructResult<()> {
        if self.name.is_empty() {
            return Err(StructError::InvalidConfig("struct name must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(StructError::InvalidConfig(format!(
                    "field '{}' declared more than once",
                    field.name
                )));
            }
        }
        Ok(())
    }
}
