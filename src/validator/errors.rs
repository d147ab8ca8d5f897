//! Validator error types

use thiserror::Error;

use crate::value::Value;

/// A value was rejected by its field's validator.
///
/// Mirrors the shape of a type-mismatch report: which field, what was
/// expected, what was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Property \"{field}\" must be {expected}, got {actual}")]
pub struct ValidationError {
    /// Field path (e.g. `"row"`, `"tags[2]"`)
    pub field: String,
    /// Expected kind or condition
    pub expected: String,
    /// What was found instead
    pub actual: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Error for custom validators that do not know their field name.
    ///
    /// The normalizer fills in the field before the error leaves it.
    pub fn expected(expected: impl Into<String>, found: &Value) -> Self {
        Self::new(String::new(), expected, found.type_name())
    }

    /// Sets the field name if the validator left it blank.
    pub fn with_field(mut self, field: &str) -> Self {
        if self.field.is_empty() {
            self.field = field.to_string();
        }
        self
    }

    /// Rewrites `field` to `field[index]` for element failures. Nested
    /// sequences stack, giving `field[i][j]`.
    pub(crate) fn at_index(mut self, field: &str, index: usize) -> Self {
        let tail = self
            .field
            .strip_prefix(field)
            .filter(|rest| rest.is_empty() || rest.starts_with('['))
            .unwrap_or_default()
            .to_string();
        self.field = format!("{}[{}]{}", field, index, tail);
        self
    }
}

/// A schema entry could not be turned into a validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid validator for property \"{field}\": {reason}")]
pub struct InvalidValidatorSpec {
    pub field: String,
    pub reason: String,
}

impl InvalidValidatorSpec {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
