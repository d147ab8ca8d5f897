//! Record: the fixed-shape field store behind one struct instance
//!
//! A record is a sealed `Map` whose key set is fixed at construction. On the
//! Immutable path the whole map is deep-frozen before any caller sees it.

use crate::value::{Map, Value, ValueResult};

#[derive(Debug, Clone)]
pub struct Record {
    data: Map,
}

impl Record {
    /// Seals the entries into a record. Key order is preserved.
    pub(crate) fn from_entries(entries: Vec<(String, Value)>) -> Self {
        let data: Map = entries.into_iter().collect();
        data.seal();
        Self { data }
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.data.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.data.entries()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.data.is_frozen()
    }

    /// The record as a value graph (same node, not a copy).
    pub fn as_value(&self) -> Value {
        Value::Map(self.data.clone())
    }

    /// Replaces an existing field's value. Fails if the record is frozen or
    /// the field is not part of it.
    pub(crate) fn write(&self, field: &str, value: Value) -> ValueResult<()> {
        self.data.insert(field, value).map(|_| ())
    }

    /// Detached, unfrozen deep copy of the current values.
    pub fn snapshot(&self) -> Value {
        self.as_value().deep_copy()
    }
}
