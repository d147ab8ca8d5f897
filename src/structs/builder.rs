//! Record builder
//!
//! Construction steps:
//! 1. Normalize the schema (skipped when a `ValidatorMap` is supplied)
//! 2. Check the field set: every default has a validator and every
//!    validator has a default
//! 3. Reject unknown override keys before any value is written
//! 4. Validate every default, then every non-null override
//! 5. Seal the record; deep-freeze it on the Immutable path
//!
//! Any error aborts the whole construction. No partially built record is
//! ever returned.

use tracing::debug;

use super::errors::{StructError, StructResult};
use super::record::Record;
use super::types::{Fields, Policy};
use crate::validator::{normalize_schema, Schema, ValidatorMap};
use crate::value::deep_freeze;

/// Builds a record, normalizing `schema` first.
pub fn build(
    type_name: &str,
    defaults: &Fields,
    schema: &Schema,
    overrides: &Fields,
    policy: Policy,
) -> StructResult<Record> {
    let validators = normalize_schema(schema)?;
    build_record(type_name, defaults, &validators, overrides, policy)
}

/// Builds a record from already-normalized validators.
pub fn build_record(
    type_name: &str,
    defaults: &Fields,
    validators: &ValidatorMap,
    overrides: &Fields,
    policy: Policy,
) -> StructResult<Record> {
    check_field_set(type_name, defaults, validators)?;

    if let Some(unknown) = overrides.keys().find(|k| !validators.contains(k)) {
        debug!(type_name, field = unknown, "rejected unknown override");
        return Err(StructError::unknown_field(type_name, unknown));
    }

    let mut entries = Vec::with_capacity(validators.len());
    for field in validators.fields() {
        let raw = defaults
            .get(field)
            .ok_or_else(|| missing_default(type_name, field))?
            .deep_copy();
        let value = validate(validators, type_name, field, &raw)?;
        entries.push((field.clone(), value));
    }

    for (field, value) in entries.iter_mut() {
        match overrides.get(field) {
            Some(raw) if !raw.is_null() => *value = validate(validators, type_name, field, raw)?,
            _ => {}
        }
    }

    let record = Record::from_entries(entries);
    if policy.is_immutable() {
        deep_freeze(&record.as_value());
    }

    debug!(
        type_name,
        policy = policy.name(),
        fields = record.len(),
        overrides = overrides.len(),
        "built struct record"
    );
    Ok(record)
}

/// Checks that `defaults` and `validators` declare the same field set.
pub(crate) fn check_field_set(
    type_name: &str,
    defaults: &Fields,
    validators: &ValidatorMap,
) -> StructResult<()> {
    if let Some(field) = defaults.keys().find(|k| !validators.contains(k)) {
        return Err(StructError::unknown_field(type_name, field));
    }
    if let Some(field) = validators.fields().iter().find(|f| !defaults.contains(f)) {
        return Err(missing_default(type_name, field));
    }
    Ok(())
}

fn validate(
    validators: &ValidatorMap,
    type_name: &str,
    field: &str,
    raw: &crate::value::Value,
) -> StructResult<crate::value::Value> {
    match validators.validate(field, raw) {
        Some(result) => result.map_err(|e| {
            debug!(type_name, field, error = %e, "validation failed during construction");
            StructError::from(e)
        }),
        None => Err(StructError::unknown_field(type_name, field)),
    }
}

fn missing_default(type_name: &str, field: &str) -> StructError {
    StructError::MissingDefault {
        type_name: type_name.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::StructErrorCode;
    use crate::validator::{PrimitiveKind, ValidationError, ValidatorSpec};
    use crate::value::{is_deep_frozen, Value};
    use serde_json::json;

    fn soil_schema() -> Schema {
        Schema::new()
            .field("row", PrimitiveKind::Number)
            .field("topf", PrimitiveKind::String)
    }

    fn soil_defaults() -> Fields {
        Fields::new().with("row", 0).with("topf", "")
    }

    #[test]
    fn test_defaults_only() {
        let record = build("Soil", &soil_defaults(), &soil_schema(), &Fields::new(), Policy::Mutable)
            .unwrap();
        assert_eq!(record.get("row"), Some(Value::Int(0)));
        assert_eq!(record.get("topf"), Some(Value::from("")));
    }

    #[test]
    fn test_valid_override_applied() {
        let overrides = Fields::new().with("row", 5);
        let record =
            build("Soil", &soil_defaults(), &soil_schema(), &overrides, Policy::Immutable).unwrap();
        assert_eq!(record.get("row"), Some(Value::Int(5)));
        assert_eq!(record.get("topf"), Some(Value::from("")));
    }

    #[test]
    fn test_invalid_override_names_field() {
        let overrides = Fields::new().with("row", "bad");
        let err = build("Soil", &soil_defaults(), &soil_schema(), &overrides, Policy::Immutable)
            .unwrap_err();
        assert_eq!(err.code(), StructErrorCode::ValidationFailed);
        assert_eq!(err.field(), Some("row"));
        assert!(err.to_string().contains("\"row\""));
    }

    #[test]
    fn test_unknown_override_rejected() {
        let overrides = Fields::new().with("foo", 1);
        for policy in [Policy::Immutable, Policy::Mutable] {
            let err =
                build("Soil", &soil_defaults(), &soil_schema(), &overrides, policy).unwrap_err();
            assert_eq!(err, StructError::unknown_field("Soil", "foo"));
        }
    }

    #[test]
    fn test_unknown_key_wins_over_invalid_value() {
        let overrides = Fields::new().with("row", "bad").with("foo", 1);
        let err = build("Soil", &soil_defaults(), &soil_schema(), &overrides, Policy::Mutable)
            .unwrap_err();
        assert_eq!(err.code(), StructErrorCode::UnknownField);
    }

    #[test]
    fn test_null_override_keeps_default() {
        let overrides = Fields::new().with("row", Value::Null);
        let record =
            build("Soil", &soil_defaults(), &soil_schema(), &overrides, Policy::Mutable).unwrap();
        assert_eq!(record.get("row"), Some(Value::Int(0)));
    }

    #[test]
    fn test_defaults_are_validated() {
        let defaults = Fields::new().with("row", "NaN").with("topf", "");
        let err =
            build("Soil", &defaults, &soil_schema(), &Fields::new(), Policy::Immutable).unwrap_err();
        assert_eq!(
            err,
            StructError::Validation(ValidationError::new("row", "a number", "string"))
        );
    }

    #[test]
    fn test_field_set_mismatch() {
        let extra = soil_defaults().with("woche", 0);
        let err = build("Soil", &extra, &soil_schema(), &Fields::new(), Policy::Mutable)
            .unwrap_err();
        assert_eq!(err.code(), StructErrorCode::UnknownField);

        let missing = Fields::new().with("row", 0);
        let err = build("Soil", &missing, &soil_schema(), &Fields::new(), Policy::Mutable)
            .unwrap_err();
        assert_eq!(err.code(), StructErrorCode::MissingDefault);
    }

    #[test]
    fn test_invalid_schema_rejected_before_build() {
        let schema = soil_schema().field("tags", ValidatorSpec::Sequence(vec![]));
        let defaults = soil_defaults().with("tags", Value::from(vec![]));
        let err = build("Soil", &defaults, &schema, &Fields::new(), Policy::Mutable).unwrap_err();
        assert_eq!(err.code(), StructErrorCode::InvalidValidatorSpec);
    }

    #[test]
    fn test_immutable_record_is_deep_frozen() {
        let schema = Schema::new().field("items", ValidatorSpec::func(|raw| Ok(raw.clone())));
        let defaults = Fields::new().with("items", Value::from(json!([1, {"nested": 2}])));

        let record = build("Items", &defaults, &schema, &Fields::new(), Policy::Immutable).unwrap();
        assert!(is_deep_frozen(&record.as_value()));

        let record = build("Items", &defaults, &schema, &Fields::new(), Policy::Mutable).unwrap();
        assert!(!record.is_frozen());
    }

    #[test]
    fn test_defaults_table_never_frozen() {
        let schema = Schema::new().field("items", ValidatorSpec::func(|raw| Ok(raw.clone())));
        let defaults = Fields::new().with("items", Value::from(json!([1, 2])));

        build("Items", &defaults, &schema, &Fields::new(), Policy::Immutable).unwrap();
        assert!(!defaults.get("items").unwrap().as_list().unwrap().is_frozen());
    }
}
