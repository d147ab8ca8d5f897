//! strictstruct - fixed-shape, schema-validated struct instances
//!
//! Normalizes heterogeneous field validators, builds records from defaults
//! plus overrides under strict schema enforcement, and guards each record
//! with an Immutable or Mutable access policy.

pub mod structs;
pub mod validator;
pub mod value;
