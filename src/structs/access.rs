//! Access controller for struct instances
//!
//! Every interaction with a built record goes through `StructInstance`,
//! which exposes a closed set of named operations:
//! - read: `get`, `field`, `has`, `keys`, `descriptor`, `snapshot`
//! - write: `set` (policy-governed)
//! - always rejected: `delete`, `define`, `set_ancestor`, `call`,
//!   `construct`
//!
//! Unknown-field reads never fail; they return `None`.

use serde::ser::{Error as _, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::errors::{Mutation, StructError, StructResult};
use super::record::Record;
use super::types::{Policy, PropertyDescriptor};
use crate::validator::ValidatorMap;
use crate::value::Value;

/// Operations an instance exposes through `get` alongside its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Plain copy of the current field values
    Snapshot,
}

impl Operation {
    /// Resolves an operation name. `"toJSON"` is accepted as an alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "snapshot" | "toJSON" => Some(Operation::Snapshot),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Snapshot => "snapshot",
        }
    }
}

/// An operation bound to the instance it was read from.
///
/// Holds its own handle to the instance, so it stays usable after the
/// original handle is dropped.
#[derive(Clone)]
pub struct BoundOperation {
    operation: Operation,
    instance: StructInstance,
}

impl BoundOperation {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn invoke(&self) -> Value {
        match self.operation {
            Operation::Snapshot => self.instance.snapshot(),
        }
    }
}

impl fmt::Debug for BoundOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance.type_name(), self.operation.name())
    }
}

/// Result of a `get`: a field value or a bound operation.
#[derive(Debug, Clone)]
pub enum Member {
    Field(Value),
    Operation(BoundOperation),
}

impl Member {
    pub fn as_field(&self) -> Option<&Value> {
        match self {
            Member::Field(value) => Some(value),
            Member::Operation(_) => None,
        }
    }

    pub fn into_field(self) -> Option<Value> {
        match self {
            Member::Field(value) => Some(value),
            Member::Operation(_) => None,
        }
    }

    pub fn as_operation(&self) -> Option<&BoundOperation> {
        match self {
            Member::Operation(op) => Some(op),
            Member::Field(_) => None,
        }
    }
}

struct Inner {
    type_name: Arc<str>,
    policy: Policy,
    record: Record,
    validators: ValidatorMap,
}

/// A record plus its policy and type name.
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct StructInstance {
    inner: Arc<Inner>,
}

impl StructInstance {
    pub(crate) fn new(
        type_name: Arc<str>,
        policy: Policy,
        record: Record,
        validators: ValidatorMap,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                type_name,
                policy,
                record,
                validators,
            }),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    pub fn policy(&self) -> Policy {
        self.inner.policy
    }

    /// Type identity check by name. An instance's type never changes.
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        *self.inner.type_name == *type_name
    }

    /// Reads a field, or an exposed operation bound to this instance.
    /// Fields shadow operations of the same name.
    pub fn get(&self, name: &str) -> Option<Member> {
        if let Some(value) = self.inner.record.get(name) {
            return Some(Member::Field(value));
        }
        Operation::from_name(name).map(|operation| {
            Member::Operation(BoundOperation {
                operation,
                instance: self.clone(),
            })
        })
    }

    /// Reads a declared field only.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.inner.record.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.record.contains(name)
    }

    /// Declared field names, in declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.record.fields()
    }

    pub fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.inner.record.get(name).map(PropertyDescriptor::data)
    }

    /// Writes a declared field.
    ///
    /// Mutable instances store the value as given, without re-validation.
    /// Immutable instances reject every write.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> StructResult<()> {
        if !self.inner.validators.contains(name) {
            debug!(type_name = self.type_name(), field = name, "rejected write to unknown field");
            return Err(StructError::unknown_field(self.type_name(), name));
        }
        match self.inner.policy {
            Policy::Immutable => Err(self.reject(name, Mutation::Set)),
            Policy::Mutable => {
                self.inner.record.write(name, value.into())?;
                Ok(())
            }
        }
    }

    /// Always fails: field sets are fixed for every policy.
    pub fn delete(&self, name: &str) -> StructResult<()> {
        Err(self.reject(name, Mutation::Delete))
    }

    /// Always fails: field definitions are fixed for every policy.
    pub fn define(&self, name: &str, _descriptor: PropertyDescriptor) -> StructResult<()> {
        Err(self.reject(name, Mutation::Define))
    }

    /// Always fails: an instance's type identity never changes.
    pub fn set_ancestor(&self, type_name: &str) -> StructResult<()> {
        debug!(
            type_name = self.type_name(),
            requested = type_name,
            "rejected type change"
        );
        Err(self.reject("prototype", Mutation::SetAncestor))
    }

    pub fn call(&self, _args: &[Value]) -> StructResult<Value> {
        Err(StructError::NotCallable {
            type_name: self.type_name().to_string(),
        })
    }

    pub fn construct(&self, _args: &[Value]) -> StructResult<StructInstance> {
        Err(StructError::NotConstructible {
            type_name: self.type_name().to_string(),
        })
    }

    /// Field sets are sealed at construction, so no instance is extensible.
    pub fn is_extensible(&self) -> bool {
        false
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.record.is_frozen()
    }

    /// Plain copy of the current values, as a detached `Value::Map`.
    /// Always reflects the latest writes.
    pub fn snapshot(&self) -> Value {
        self.inner.record.snapshot()
    }

    /// Current values as plain JSON.
    pub fn to_json(&self) -> StructResult<serde_json::Value> {
        Ok(self.inner.record.as_value().to_json()?)
    }

    fn reject(&self, field: &str, operation: Mutation) -> StructError {
        debug!(
            type_name = self.type_name(),
            field,
            operation = operation.verb(),
            policy = self.inner.policy.name(),
            "rejected mutation"
        );
        StructError::readonly(
            self.type_name(),
            field,
            operation,
            self.inner.policy.is_immutable(),
        )
    }
}

impl Serialize for StructInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl fmt::Debug for StructInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.type_name());
        for (field, value) in self.inner.record.entries() {
            out.field(&field, &value);
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{create_immutable, create_mutable, Fields, StructErrorCode};
    use crate::validator::{PrimitiveKind, Schema};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .field("row", PrimitiveKind::Number)
            .field("topf", PrimitiveKind::String)
    }

    fn defaults() -> Fields {
        Fields::new().with("row", 0).with("topf", "")
    }

    fn immutable(overrides: Fields) -> StructInstance {
        create_immutable("SoilData", &defaults(), &schema(), &overrides).unwrap()
    }

    fn mutable(overrides: Fields) -> StructInstance {
        create_mutable("SoilData", &defaults(), &schema(), &overrides).unwrap()
    }

    #[test]
    fn test_get_unknown_returns_none() {
        assert!(immutable(Fields::new()).get("nonExistent").is_none());
        assert!(mutable(Fields::new()).get("someRandomProp").is_none());
    }

    #[test]
    fn test_get_returns_bound_snapshot() {
        let im = immutable(Fields::new().with("row", 5));
        let member = im.get("toJSON").unwrap();
        let op = member.as_operation().unwrap().clone();
        drop(im);

        assert_eq!(op.operation(), Operation::Snapshot);
        assert_eq!(op.invoke(), Value::from(json!({"row": 5, "topf": ""})));
    }

    #[test]
    fn test_field_shadows_operation() {
        let schema = Schema::new().field("snapshot", PrimitiveKind::String);
        let defaults = Fields::new().with("snapshot", "field");
        let inst = create_mutable("Shadow", &defaults, &schema, &Fields::new()).unwrap();

        let member = inst.get("snapshot").unwrap();
        assert_eq!(member.into_field(), Some(Value::from("field")));
    }

    #[test]
    fn test_has_and_keys_only_report_fields() {
        let im = immutable(Fields::new());
        assert!(im.has("row"));
        assert!(!im.has("foo"));
        assert!(!im.has("snapshot"));
        assert_eq!(im.keys(), vec!["row".to_string(), "topf".to_string()]);
    }

    #[test]
    fn test_descriptor_always_reports_writable() {
        let im = immutable(Fields::new().with("row", 3));
        let desc = im.descriptor("row").unwrap();
        assert!(desc.configurable && desc.enumerable && desc.writable);
        assert_eq!(desc.value, Value::Int(3));
        assert!(im.descriptor("foo").is_none());
    }

    #[test]
    fn test_immutable_rejects_set() {
        let im = immutable(Fields::new().with("row", 5));
        let err = im.set("row", 2).unwrap_err();
        assert_eq!(err.code(), StructErrorCode::ReadonlyViolation);
        assert_eq!(im.field("row"), Some(Value::Int(5)));

        let err = im.set("foo", 1).unwrap_err();
        assert_eq!(err.code(), StructErrorCode::UnknownField);
    }

    #[test]
    fn test_mutable_set_skips_validation() {
        let mu = mutable(Fields::new());
        mu.set("row", 2).unwrap();
        assert_eq!(mu.field("row"), Some(Value::Int(2)));

        mu.set("row", "string").unwrap();
        assert_eq!(mu.field("row"), Some(Value::from("string")));

        assert_eq!(
            mu.set("foo", 1).unwrap_err(),
            StructError::unknown_field("SoilData", "foo")
        );
    }

    #[test]
    fn test_delete_and_define_always_rejected() {
        for inst in [immutable(Fields::new()), mutable(Fields::new())] {
            for name in ["row", "foo"] {
                let err = inst.delete(name).unwrap_err();
                assert!(matches!(
                    err,
                    StructError::ReadonlyViolation { operation: Mutation::Delete, .. }
                ));
                let err = inst
                    .define(name, PropertyDescriptor::data(Value::Int(99)))
                    .unwrap_err();
                assert!(matches!(
                    err,
                    StructError::ReadonlyViolation { operation: Mutation::Define, .. }
                ));
            }
            assert_eq!(inst.field("row"), Some(Value::Int(0)));
        }
    }

    #[test]
    fn test_call_and_construct_rejected() {
        let im = immutable(Fields::new());
        assert_eq!(im.call(&[]).unwrap_err().code(), StructErrorCode::NotCallable);
        let err = im.construct(&[Value::Int(1)]).unwrap_err();
        assert_eq!(err.code(), StructErrorCode::NotConstructible);
        assert!(err.to_string().contains("SoilData"));
    }

    #[test]
    fn test_type_identity_is_fixed() {
        let mu = mutable(Fields::new());
        assert!(mu.set_ancestor("Other").is_err());
        assert!(mu.is_instance_of("SoilData"));
        assert!(!mu.is_instance_of("Other"));
    }

    #[test]
    fn test_never_extensible() {
        assert!(!immutable(Fields::new()).is_extensible());
        assert!(!mutable(Fields::new()).is_extensible());
    }

    #[test]
    fn test_snapshot_tracks_mutations() {
        let mu = mutable(Fields::new().with("row", 1));
        mu.set("row", 33).unwrap();
        let snap = mu.snapshot();
        assert_eq!(snap.as_map().unwrap().get("row"), Some(Value::Int(33)));
        assert_eq!(mu.to_json().unwrap(), json!({"row": 33, "topf": ""}));
    }

    #[test]
    fn test_serialize_and_debug() {
        let im = immutable(Fields::new().with("topf", "A1"));
        assert_eq!(
            serde_json::to_string(&im).unwrap(),
            r#"{"row":0,"topf":"A1"}"#
        );
        assert_eq!(format!("{:?}", im), r#"SoilData { row: 0, topf: "A1" }"#);
    }

    #[test]
    fn test_clones_share_state() {
        let mu = mutable(Fields::new());
        let alias = mu.clone();
        mu.set("topf", "B2").unwrap();
        assert_eq!(alias.field("topf"), Some(Value::from("B2")));
    }
}
