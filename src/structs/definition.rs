//! Struct definitions and construction entry points
//!
//! A `StructDefinition` is declared once per domain struct: its defaults
//! fix the field set, its schema is normalized once, and every instance is
//! built from both. The free functions `create_immutable` and
//! `create_mutable` are the one-shot forms that normalize per call.

use std::sync::Arc;

use super::access::StructInstance;
use super::builder::{build_record, check_field_set};
use super::config::StructConfig;
use super::errors::StructResult;
use super::types::{Fields, Policy};
use crate::validator::{normalize_schema, Schema, ValidatorMap};

#[derive(Debug, Clone)]
pub struct StructDefinition {
    name: Arc<str>,
    defaults: Fields,
    validators: ValidatorMap,
    policy: Policy,
}

impl StructDefinition {
    /// Declares a struct type. Fails on malformed validator specs or if
    /// `defaults` and `schema` disagree on the field set.
    pub fn new(name: impl Into<String>, defaults: Fields, schema: &Schema) -> StructResult<Self> {
        let name: Arc<str> = Arc::from(name.into());
        let validators = normalize_schema(schema)?;
        check_field_set(&name, &defaults, &validators)?;
        Ok(Self {
            name,
            defaults,
            validators,
            policy: Policy::default(),
        })
    }

    /// Builds a definition from declarative config. The configured policy
    /// becomes the default for `instantiate`.
    pub fn from_config(config: &StructConfig) -> StructResult<Self> {
        let schema = config.schema()?;
        Ok(Self::new(config.name.clone(), config.defaults(), &schema)?.with_policy(config.policy))
    }

    /// Sets the policy used by `instantiate`.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Declared field names, in declaration order.
    pub fn fields(&self) -> &[String] {
        self.validators.fields()
    }

    pub fn defaults(&self) -> &Fields {
        &self.defaults
    }

    pub fn create(&self, policy: Policy, overrides: &Fields) -> StructResult<StructInstance> {
        let record = build_record(&self.name, &self.defaults, &self.validators, overrides, policy)?;
        Ok(StructInstance::new(
            Arc::clone(&self.name),
            policy,
            record,
            self.validators.clone(),
        ))
    }

    /// Immutable instance.
    pub fn of(&self, overrides: &Fields) -> StructResult<StructInstance> {
        self.create(Policy::Immutable, overrides)
    }

    /// Mutable instance.
    pub fn of_mutable(&self, overrides: &Fields) -> StructResult<StructInstance> {
        self.create(Policy::Mutable, overrides)
    }

    /// Instance with the definition's configured policy.
    pub fn instantiate(&self, overrides: &Fields) -> StructResult<StructInstance> {
        self.create(self.policy, overrides)
    }
}

pub fn create_immutable(
    type_name: &str,
    defaults: &Fields,
    schema: &Schema,
    overrides: &Fields,
) -> StructResult<StructInstance> {
    create(type_name, defaults, schema, overrides, Policy::Immutable)
}

pub fn create_mutable(
    type_name: &str,
    defaults: &Fields,
    schema: &Schema,
    overrides: &Fields,
) -> StructResult<StructInstance> {
    create(type_name, defaults, schema, overrides, Policy::Mutable)
}

fn create(
    type_name: &str,
    defaults: &Fields,
    schema: &Schema,
    overrides: &Fields,
    policy: Policy,
) -> StructResult<StructInstance> {
    let validators = normalize_schema(schema)?;
    let record = build_record(type_name, defaults, &validators, overrides, policy)?;
    Ok(StructInstance::new(Arc::from(type_name), policy, record, validators))
}
