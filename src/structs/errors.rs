//! Struct error types
//!
//! Error codes:
//! - STRUCT_INVALID_VALIDATOR_SPEC (definition time)
//! - STRUCT_VALIDATION_FAILED
//! - STRUCT_UNKNOWN_FIELD
//! - STRUCT_MISSING_DEFAULT (definition time)
//! - STRUCT_READONLY_VIOLATION
//! - STRUCT_NOT_CALLABLE
//! - STRUCT_NOT_CONSTRUCTIBLE
//! - STRUCT_VALUE_ERROR
//! - STRUCT_INVALID_CONFIG (definition time)

use std::fmt;
use thiserror::Error;

use crate::validator::{InvalidValidatorSpec, ValidationError};
use crate::value::ValueError;

/// Stable error codes for struct errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructErrorCode {
    InvalidValidatorSpec,
    ValidationFailed,
    UnknownField,
    MissingDefault,
    ReadonlyViolation,
    NotCallable,
    NotConstructible,
    ValueError,
    InvalidConfig,
}

impl StructErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StructErrorCode::InvalidValidatorSpec => "STRUCT_INVALID_VALIDATOR_SPEC",
            StructErrorCode::ValidationFailed => "STRUCT_VALIDATION_FAILED",
            StructErrorCode::UnknownField => "STRUCT_UNKNOWN_FIELD",
            StructErrorCode::MissingDefault => "STRUCT_MISSING_DEFAULT",
            StructErrorCode::ReadonlyViolation => "STRUCT_READONLY_VIOLATION",
            StructErrorCode::NotCallable => "STRUCT_NOT_CALLABLE",
            StructErrorCode::NotConstructible => "STRUCT_NOT_CONSTRUCTIBLE",
            StructErrorCode::ValueError => "STRUCT_VALUE_ERROR",
            StructErrorCode::InvalidConfig => "STRUCT_INVALID_CONFIG",
        }
    }

    /// Whether the error describes a broken struct definition rather than a
    /// rejected operation on a well-formed one.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            StructErrorCode::InvalidValidatorSpec
                | StructErrorCode::MissingDefault
                | StructErrorCode::InvalidConfig
        )
    }
}

impl fmt::Display for StructErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Operations that can be rejected as a read-only violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Set,
    Delete,
    Define,
    SetAncestor,
}

impl Mutation {
    pub fn verb(&self) -> &'static str {
        match self {
            Mutation::Set => "modify",
            Mutation::Delete => "delete",
            Mutation::Define => "define",
            Mutation::SetAncestor => "change the type of",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructError {
    #[error(transparent)]
    InvalidValidatorSpec(#[from] InvalidValidatorSpec),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Property \"{field}\" does not exist on \"{type_name}\"")]
    UnknownField { type_name: String, field: String },

    #[error("Property \"{field}\" on \"{type_name}\" has a validator but no default")]
    MissingDefault { type_name: String, field: String },

    #[error("Cannot {operation} property \"{field}\" on {} struct \"{type_name}\"", shape_label(.readonly))]
    ReadonlyViolation {
        type_name: String,
        field: String,
        operation: Mutation,
        /// True when rejected because the instance is Immutable, false when
        /// rejected because field sets are fixed for every policy.
        readonly: bool,
    },

    #[error("\"{type_name}\" is not callable")]
    NotCallable { type_name: String },

    #[error("\"{type_name}\" is not a constructor; use a factory instead")]
    NotConstructible { type_name: String },

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("Invalid struct config: {0}")]
    InvalidConfig(String),
}

impl StructError {
    pub fn unknown_field(type_name: &str, field: &str) -> Self {
        StructError::UnknownField {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn readonly(type_name: &str, field: &str, operation: Mutation, readonly: bool) -> Self {
        StructError::ReadonlyViolation {
            type_name: type_name.to_string(),
            field: field.to_string(),
            operation,
            readonly,
        }
    }

    pub fn code(&self) -> StructErrorCode {
        match self {
            StructError::InvalidValidatorSpec(_) => StructErrorCode::InvalidValidatorSpec,
            StructError::Validation(_) => StructErrorCode::ValidationFailed,
            StructError::UnknownField { .. } => StructErrorCode::UnknownField,
            StructError::MissingDefault { .. } => StructErrorCode::MissingDefault,
            StructError::ReadonlyViolation { .. } => StructErrorCode::ReadonlyViolation,
            StructError::NotCallable { .. } => StructErrorCode::NotCallable,
            StructError::NotConstructible { .. } => StructErrorCode::NotConstructible,
            StructError::Value(_) => StructErrorCode::ValueError,
            StructError::InvalidConfig(_) => StructErrorCode::InvalidConfig,
        }
    }

    /// Returns the field the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            StructError::InvalidValidatorSpec(e) => Some(&e.field),
            StructError::Validation(e) => Some(&e.field),
            StructError::UnknownField { field, .. }
            | StructError::MissingDefault { field, .. }
            | StructError::ReadonlyViolation { field, .. } => Some(field),
            _ => None,
        }
    }
}

fn shape_label(readonly: &bool) -> &'static str {
    if *readonly {
        "readonly"
    } else {
        "fixed-shape"
    }
}

/// Result type for struct operations
pub type StructResult<T> = Result<T, StructError>;
