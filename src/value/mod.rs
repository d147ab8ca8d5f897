//! Value model for struct records
//!
//! # Design Principles
//!
//! - Explicit tagged union of scalar, sequence and mapping shapes
//! - Composites are shared nodes with reference identity
//! - Immutability is a one-way flag on each node, set by deep freeze
//! - Values are `Send + Sync`; frozen graphs are safe for concurrent readers

mod convert;
mod errors;
mod freeze;
mod types;

pub use errors::{ValueError, ValueResult};
pub use freeze::{deep_freeze, deep_freeze_with, is_deep_frozen};
pub use types::{List, Map, Value};
