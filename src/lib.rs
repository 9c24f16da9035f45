//! # record-guard
//!
//! Fail-fast structural validation for trees of schema-defined records.
//!
//! ## Overview
//!
//! `record-guard` walks a record, and every record nested inside it, against
//! the constraints declared in its schema and reports the first violation as a
//! single structured error:
//! - Field rules evaluated in declaration order (first failure wins)
//! - Recursive descent into nested, repeated and keyed records
//! - Indexed (`Field[3]`) and keyed (`Field[key]`) addressing in errors
//! - Nested failures wrapped, never flattened, so the full chain is kept
//! - A depth budget that bounds the walk on cyclic or very deep graphs
//!
//! ## Quick Start
//!
//! ```rust
//! use record_guard::prelude::*;
//! use record_guard::rules::{Rule, WellKnown};
//! use std::sync::LazyLock;
//!
//! struct Experiment {
//!     id: String,
//! }
//!
//! struct GetExperimentsResponse {
//!     experiments: Vec<Experiment>,
//! }
//!
//! static EXPERIMENT: LazyLock<RecordDescriptor> = LazyLock::new(|| {
//!     RecordDescriptor::new("Experiment")
//!         .field(FieldDescriptor::scalar("Id").rule(Rule::Format(WellKnown::Uuid)))
//! });
//!
//! static RESPONSE: LazyLock<RecordDescriptor> = LazyLock::new(|| {
//!     RecordDescriptor::new("GetExperimentsResponse")
//!         .field(FieldDescriptor::repeated_messages("Experiments"))
//! });
//!
//! impl Record for Experiment {
//!     fn descriptor(&self) -> &'static RecordDescriptor {
//!         &EXPERIMENT
//!     }
//!
//!     fn field(&self, name: &str) -> FieldValue<'_> {
//!         match name {
//!             "Id" => FieldValue::scalar(&self.id),
//!             _ => FieldValue::Missing,
//!         }
//!     }
//! }
//!
//! impl Validate for Experiment {
//!     fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
//!         ctx.check(self)
//!     }
//! }
//!
//! impl Record for GetExperimentsResponse {
//!     fn descriptor(&self) -> &'static RecordDescriptor {
//!         &RESPONSE
//!     }
//!
//!     fn field(&self, name: &str) -> FieldValue<'_> {
//!         match name {
//!             "Experiments" => FieldValue::messages(&self.experiments),
//!             _ => FieldValue::Missing,
//!         }
//!     }
//! }
//!
//! impl Validate for GetExperimentsResponse {
//!     fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
//!         ctx.check(self)
//!     }
//! }
//!
//! let response = GetExperimentsResponse {
//!     experiments: vec![
//!         Experiment { id: "6ba7b810-9dad-11d1-80b4-00c04fd430c8".into() },
//!         Experiment { id: "not-a-uuid".into() },
//!     ],
//! };
//!
//! let err = response.validate().unwrap_err();
//! assert_eq!(err.field(), "Experiments[1]");
//! assert_eq!(err.path(), "Experiments[1].Id");
//! assert_eq!(
//!     err.to_string(),
//!     "invalid GetExperimentsResponse.Experiments[1]: embedded message failed validation \
//!      | caused by: invalid Experiment.Id: value must be a valid UUID"
//! );
//! ```
//!
//! ## Feature Flags
//!
//! The `yaml`, `toml` and `json` features select which options file formats
//! [`Guard::builder`](core::Guard::builder) can read. All are on by default.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod rules;
pub mod schema;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        Context, Guard, GuardBuilder, Validate, ValidateExt, ValidationOptions,
    };
    pub use crate::error::{Error, Result, ValidationError};
    pub use crate::schema::{Element, FieldDescriptor, FieldValue, Record, RecordDescriptor};
}
