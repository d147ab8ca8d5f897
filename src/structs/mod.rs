//! Validated struct construction
//!
//! Builds fixed-shape records from declared defaults plus partial
//! overrides, and wraps each record in an access controller that enforces
//! one of two policies.
//!
//! # Design Principles
//!
//! - A record's field set is fixed for its whole lifetime
//! - Every value entering a record during construction passes its field's
//!   validator, defaults included
//! - Construction is all-or-nothing
//! - Immutable: every write rejected, the record deep-frozen
//! - Mutable: known fields writable without re-validation
//! - Delete, define, call, construct and type changes are always rejected
//!
//! # Usage
//!
//! ```ignore
//! use strictstruct::structs::{Fields, StructDefinition};
//! use strictstruct::validator::{PrimitiveKind, Schema};
//!
//! let soil = StructDefinition::new(
//!     "SoilData",
//!     Fields::new().with("row", 0).with("topf", ""),
//!     &Schema::new()
//!         .field("row", PrimitiveKind::Number)
//!         .field("topf", PrimitiveKind::String),
//! )?;
//!
//! let im = soil.of(&Fields::new().with("row", 5))?;
//! assert!(im.set("row", 2).is_err());
//! ```

mod access;
mod builder;
mod config;
mod definition;
mod errors;
mod record;
mod types;

pub use access::{BoundOperation, Member, Operation, StructInstance};
pub use builder::{build, build_record};
pub use config::{FieldConfig, StructConfig};
pub use definition::{create_immutable, create_mutable, StructDefinition};
pub use errors::{Mutation, StructError, StructErrorCode, StructResult};
pub use record::Record;
pub use types::{Fields, Policy, PropertyDescriptor};
