//! SoilData Struct Tests
//!
//! End-to-end tests for a domain struct declared once and instantiated
//! through `of` / `of_mutable`:
//! - Custom enum-like validators
//! - Immutable and mutable instances
//! - toJSON export and bound operations
//! - Debug and serde output

use serde_json::json;
use strictstruct::structs::{Fields, Member, Policy, StructDefinition, StructErrorCode};
use strictstruct::validator::{PrimitiveKind, Schema, ValidationError, ValidatorSpec};
use strictstruct::value::Value;

// =============================================================================
// Helper Functions
// =============================================================================

const POT_COLORS: std::ops::RangeInclusive<i64> = 0..=3;
const SOIL_TYPES: std::ops::RangeInclusive<i64> = 0..=2;

fn enum_validator(expected: &'static str, range: std::ops::RangeInclusive<i64>) -> ValidatorSpec {
    ValidatorSpec::func(move |raw| match raw {
        Value::Int(n) if range.contains(n) => Ok(raw.clone()),
        _ => Err(ValidationError::expected(expected, raw)),
    })
}

fn soil_data() -> StructDefinition {
    StructDefinition::new(
        "SoilData",
        Fields::new()
            .with("row", 0)
            .with("topf", "")
            .with("woche", 0)
            .with("amount", 0)
            .with("potcolor", 1)
            .with("soiltype", 0),
        &Schema::new()
            .field("row", PrimitiveKind::Number)
            .field("topf", PrimitiveKind::String)
            .field("woche", PrimitiveKind::Number)
            .field("amount", PrimitiveKind::Number)
            .field("potcolor", enum_validator("a valid pot color", POT_COLORS))
            .field("soiltype", enum_validator("a valid soil type", SOIL_TYPES)),
    )
    .unwrap()
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_unknown_key_rejected() {
    let soil = soil_data();
    assert_eq!(
        soil.of(&Fields::new().with("unknown", 123)).unwrap_err().code(),
        StructErrorCode::UnknownField
    );
    assert_eq!(
        soil.of_mutable(&Fields::new().with("foo", "bar")).unwrap_err().code(),
        StructErrorCode::UnknownField
    );
}

#[test]
fn test_invalid_override_types_rejected() {
    let soil = soil_data();
    for overrides in [
        Fields::new().with("row", "bad"),
        Fields::new().with("topf", 938),
        Fields::new().with("soiltype", 999),
    ] {
        let err = soil.of(&overrides).unwrap_err();
        assert_eq!(err.code(), StructErrorCode::ValidationFailed);
    }

    let err = soil.of_mutable(&Fields::new().with("potcolor", 999)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Property \"potcolor\" must be a valid pot color, got number"
    );
}

/// Construction is all-or-nothing: the first bad field aborts everything.
#[test]
fn test_partial_failure_builds_nothing() {
    let soil = soil_data();
    let overrides = Fields::new()
        .with("row", 4)
        .with("amount", "six")
        .with("topf", "C3");
    let err = soil.of_mutable(&overrides).unwrap_err();
    assert_eq!(err.field(), Some("amount"));
}

// =============================================================================
// Immutable Tests
// =============================================================================

#[test]
fn test_immutable_defaults() {
    let im = soil_data().of(&Fields::new()).unwrap();
    assert_eq!(im.policy(), Policy::Immutable);
    assert_eq!(
        im.to_json().unwrap(),
        json!({"row": 0, "topf": "", "woche": 0, "amount": 0, "potcolor": 1, "soiltype": 0})
    );
    assert!(im.is_frozen());
}

#[test]
fn test_immutable_rejects_writes() {
    let im = soil_data().of(&Fields::new().with("amount", 5)).unwrap();
    let err = im.set("amount", 6).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot modify property \"amount\" on readonly struct \"SoilData\""
    );
    assert_eq!(im.field("amount"), Some(Value::Int(5)));
}

// =============================================================================
// Mutable Tests
// =============================================================================

#[test]
fn test_mutable_updates_fields() {
    let mu = soil_data().of_mutable(&Fields::new().with("row", 7)).unwrap();
    mu.set("woche", 12).unwrap();
    mu.set("topf", "A1").unwrap();

    assert_eq!(mu.field("row"), Some(Value::Int(7)));
    assert_eq!(mu.field("woche"), Some(Value::Int(12)));
    assert_eq!(mu.field("topf"), Some(Value::from("A1")));
}

#[test]
fn test_mutable_handles_share_state() {
    let mu = soil_data().of_mutable(&Fields::new()).unwrap();
    let other = mu.clone();
    mu.set("amount", 3).unwrap();
    assert_eq!(other.field("amount"), Some(Value::Int(3)));
}

#[test]
fn test_mutable_define_always_errors() {
    let mu = soil_data().of_mutable(&Fields::new().with("row", 7)).unwrap();
    let err = mu
        .define("row", strictstruct::structs::PropertyDescriptor::data(Value::Int(99)))
        .unwrap_err();
    assert!(err.to_string().starts_with("Cannot define property"));
    assert_eq!(mu.field("row"), Some(Value::Int(7)));
}

// =============================================================================
// Export Tests
// =============================================================================

/// An extracted toJSON operation stays bound to its instance.
#[test]
fn test_extracted_to_json_stays_bound() {
    let im = soil_data().of(&Fields::new().with("amount", 5)).unwrap();
    let to_json = match im.get("toJSON") {
        Some(Member::Operation(op)) => op,
        other => panic!("expected operation, got {:?}", other),
    };
    assert_eq!(to_json.invoke(), im.snapshot());
    assert_eq!(to_json.invoke().to_json().unwrap()["amount"], json!(5));
}

#[test]
fn test_serde_serializes_current_values() {
    let mu = soil_data().of_mutable(&Fields::new()).unwrap();
    mu.set("topf", "B7").unwrap();
    let out = serde_json::to_value(&mu).unwrap();
    assert_eq!(out["topf"], json!("B7"));
    assert_eq!(out.as_object().unwrap().len(), 6);
}

#[test]
fn test_debug_shows_type_and_fields() {
    let im = soil_data().of(&Fields::new().with("topf", "A1")).unwrap();
    let rendered = format!("{:?}", im);
    assert!(rendered.starts_with("SoilData {"));
    assert!(rendered.contains("topf: \"A1\""));
}

#[test]
fn test_unknown_props_read_as_none() {
    let soil = soil_data();
    assert!(soil.of_mutable(&Fields::new()).unwrap().get("nonExistent").is_none());
    assert!(soil.of(&Fields::new()).unwrap().get("someRandomProp").is_none());
}
