//! Human readable addressing of fields inside a record.

use crate::error::ValidationError;
use crate::schema::Scalar;
use std::fmt;

/// The address of a field (or one of its elements) within its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    text: String,
    key: bool,
}

/// Path of a singular field: `Field`.
pub fn describe(name: &str) -> FieldPath {
    FieldPath {
        text: name.to_string(),
        key: false,
    }
}

/// Path of one element of a repeated field: `Field[3]`.
pub fn describe_indexed(name: &str, index: usize) -> FieldPath {
    FieldPath {
        text: format!("{}[{}]", name, index),
        key: false,
    }
}

/// Path of one entry of a keyed collection: `Field[key]`.
///
/// `is_key` marks a violation about the key itself rather than its value.
pub fn describe_keyed(name: &str, key: &Scalar<'_>, is_key: bool) -> FieldPath {
    FieldPath {
        text: format!("{}[{}]", name, key),
        key: is_key,
    }
}

impl FieldPath {
    /// The rendered path.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the path addresses a map key.
    pub fn is_key(&self) -> bool {
        self.key
    }

    /// Build the violation for this path in `record`.
    pub fn violation(self, record: &'static str, reason: impl Into<String>) -> ValidationError {
        ValidationError::new(record, self.text, reason).with_key(self.key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
