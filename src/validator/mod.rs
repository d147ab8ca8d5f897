//! Validator normalization for struct schemas
//!
//! A schema maps each field to a raw validator spec. Specs are normalized
//! once per schema into canonical `ValidatorFn`s, which are the only path
//! by which a raw value becomes a field's typed value during construction.
//!
//! # Design Principles
//!
//! - Primitive kinds are a closed set of strict type checks
//! - No implicit coercion; custom validators may coerce explicitly
//! - Malformed specs fail at normalization, not at first use

mod errors;
mod kind;
mod normalizer;
mod schema;
mod spec;

pub use errors::{InvalidValidatorSpec, ValidationError};
pub use kind::PrimitiveKind;
pub use normalizer::normalize_validator;
pub use schema::{normalize_schema, Schema, ValidatorMap};
pub use spec::{ValidatorFn, ValidatorSpec};
