//! Validator normalization
//!
//! Turns one raw `ValidatorSpec` into a canonical `ValidatorFn`:
//! - `Func` is wrapped so its errors always name the field
//! - `Kind` becomes a strict type check, no coercion
//! - `Sequence([inner])` becomes an array check that applies the
//!   normalized inner validator to every element, stopping at the first
//!   failure
//!
//! Any other sequence length is rejected at normalization time.

use std::sync::Arc;

use super::errors::{InvalidValidatorSpec, ValidationError};
use super::spec::{ValidatorFn, ValidatorSpec};
use crate::value::{List, Value};

pub fn normalize_validator(
    field: &str,
    spec: &ValidatorSpec,
) -> Result<ValidatorFn, InvalidValidatorSpec> {
    let name = field.to_string();
    match spec {
        ValidatorSpec::Func(f) => {
            let f = Arc::clone(f);
            Ok(Arc::new(move |raw: &Value| {
                f(raw).map_err(|e| e.with_field(&name))
            }))
        }
        ValidatorSpec::Kind(kind) => {
            let kind = *kind;
            Ok(Arc::new(move |raw: &Value| {
                if kind.matches(raw) {
                    Ok(raw.clone())
                } else {
                    Err(ValidationError::new(&name, kind.expectation(), raw.type_name()))
                }
            }))
        }
        ValidatorSpec::Sequence(items) => match items.as_slice() {
            [inner] => {
                let inner = normalize_validator(field, inner)?;
                Ok(Arc::new(move |raw: &Value| {
                    let list = raw
                        .as_list()
                        .ok_or_else(|| ValidationError::new(&name, "an array", raw.type_name()))?;
                    list.to_vec()
                        .iter()
                        .enumerate()
                        .map(|(i, item)| inner(item).map_err(|e| e.at_index(&name, i)))
                        .collect::<Result<List, _>>()
                        .map(Value::List)
                }))
            }
            _ => Err(InvalidValidatorSpec::new(
                field,
                format!(
                    "sequence validator must have exactly one element, found {}",
                    items.len()
                ),
            )),
        },
    }
}
