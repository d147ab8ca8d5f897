//! Conversion between value graphs and plain JSON
//!
//! Plain JSON has no notion of identity, so:
//! - importing always creates fresh, unfrozen composites
//! - exporting copies the current contents and rejects cycles

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::Number;
use std::collections::HashSet;

use super::errors::{ValueError, ValueResult};
use super::types::{List, Map, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect::<List>())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl Value {
    /// Exports the current contents as plain JSON.
    ///
    /// Shared (non-cyclic) substructure is duplicated. Non-finite floats
    /// export as `null`, as JSON has no representation for them.
    pub fn to_json(&self) -> ValueResult<serde_json::Value> {
        to_json_inner(self, &mut HashSet::new())
    }
}

/// `path` holds the composites on the current descent, not every composite
/// seen so far, so diamonds are allowed and only true cycles fail.
fn to_json_inner(value: &Value, path: &mut HashSet<usize>) -> ValueResult<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Float(n) => Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(list) => {
            if !path.insert(list.id()) {
                return Err(ValueError::Cycle { shape: "list" });
            }
            let items = list
                .to_vec()
                .iter()
                .map(|item| to_json_inner(item, path))
                .collect::<ValueResult<Vec<_>>>()?;
            path.remove(&list.id());
            serde_json::Value::Array(items)
        }
        Value::Map(map) => {
            if !path.insert(map.id()) {
                return Err(ValueError::Cycle { shape: "map" });
            }
            let mut out = serde_json::Map::new();
            for (key, item) in map.entries() {
                out.insert(key, to_json_inner(&item, path)?);
            }
            path.remove(&map.id());
            serde_json::Value::Object(out)
        }
    })
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
