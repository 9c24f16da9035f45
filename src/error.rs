//! Error types for record-guard.

use serde::Serialize;
use std::fmt;

/// Result type alias for record-guard operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur when loading options or guarding envelopes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to load options from a source.
    #[error("Failed to load options: {0}")]
    LoadError(String),

    /// Failed to deserialize options.
    #[error("Failed to deserialize options: {0}")]
    DeserializationError(String),

    /// An envelope was rejected because one of its records failed validation.
    #[error("Envelope rejected: {0}")]
    ValidationError(#[from] ValidationError),

    /// Generic error for other cases.
    #[error("record-guard error: {0}")]
    Other(String),
}

/// A single structural violation found while validating a record.
///
/// The violation is namespaced by the record type that owns the field, so the
/// same field name in two different records never produces the same error
/// identity. When the failing field is itself a nested record, the nested
/// violation is kept as the [`cause`](Self::cause) rather than flattened.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error(
    "invalid {}{}.{}: {}{}",
    key_prefix(.key),
    .record,
    .field,
    .reason,
    CausedBy(.cause)
)]
pub struct ValidationError {
    record: &'static str,
    field: String,
    reason: String,
    #[source]
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<Box<ValidationError>>,
    key: bool,
}

/// Reason attached to a nested record that failed its own validation.
pub const EMBEDDED_REASON: &str = "embedded message failed validation";

fn key_prefix(key: &bool) -> &'static str {
    if *key { "key for " } else { "" }
}

struct CausedBy<'a>(&'a Option<Box<ValidationError>>);

impl fmt::Display for CausedBy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(cause) => write!(f, " | caused by: {}", cause),
            None => Ok(()),
        }
    }
}

impl ValidationError {
    /// Create a violation for a field of `record`.
    pub fn new(record: &'static str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record,
            field: field.into(),
            reason: reason.into(),
            cause: None,
            key: false,
        }
    }

    /// Create the wrapping violation for a nested record that failed.
    pub fn embedded(record: &'static str, field: impl Into<String>, cause: ValidationError) -> Self {
        Self::new(record, field, EMBEDDED_REASON).with_cause(cause)
    }

    /// Attach the nested violation that caused this one.
    pub fn with_cause(mut self, cause: ValidationError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Mark the violation as concerning a map key rather than its value.
    pub fn with_key(mut self, key: bool) -> Self {
        self.key = key;
        self
    }

    /// Name of the record type that owns the failing field.
    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Path of the failing field within its record, e.g. `Experiments[1]`.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human readable reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The nested violation, if the field was an embedded record.
    pub fn cause(&self) -> Option<&ValidationError> {
        self.cause.as_deref()
    }

    /// Whether the violation concerns a map key.
    pub fn key(&self) -> bool {
        self.key
    }

    /// Per-record error name, e.g. `ExperimentValidationError`.
    pub fn error_name(&self) -> String {
        format!("{}ValidationError", self.record)
    }

    /// Iterate the violation chain from this violation down to the leaf.
    pub fn chain(&self) -> impl Iterator<Item = &ValidationError> {
        std::iter::successors(Some(self), |err| err.cause())
    }

    /// The innermost violation of the chain.
    pub fn root_cause(&self) -> &ValidationError {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// Dotted path from the outermost record to the leaf field,
    /// e.g. `Experiments[1].Config`.
    pub fn path(&self) -> String {
        self.chain()
            .map(|err| err.field.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}
