//! Field and record descriptors.
//!
//! Descriptors are produced once per record type by the schema layer and are
//! never mutated afterwards. The usual shape is a process-wide
//! [`LazyLock`](std::sync::LazyLock):
//!
//! ```rust
//! use record_guard::rules::{Rule, WellKnown};
//! use record_guard::schema::{FieldDescriptor, RecordDescriptor};
//! use std::sync::LazyLock;
//!
//! static EXPERIMENT: LazyLock<RecordDescriptor> = LazyLock::new(|| {
//!     RecordDescriptor::new("Experiment")
//!         .field(FieldDescriptor::scalar("Id").rule(Rule::Format(WellKnown::Uuid)))
//!         .field(FieldDescriptor::message("Config").required())
//! });
//!
//! assert_eq!(EXPERIMENT.fields().len(), 2);
//! ```

use crate::rules::{ItemsRule, Rule};
use crate::schema::FieldValue;

/// The shape of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A singular leaf value.
    Scalar,
    /// A singular nested record.
    Message,
    /// A repeated leaf value.
    RepeatedScalar,
    /// A repeated nested record.
    RepeatedMessage,
    /// A keyed collection; values may be leaves or nested records.
    Map,
}

/// The constraints declared on one field.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Leaf rules, applied to the value, each repeated element, or each map value.
    pub rules: Vec<Rule>,
    /// Rules applied to each map key.
    pub keys: Vec<Rule>,
    /// Rules on the collection as a whole.
    pub items: Vec<ItemsRule>,
    /// A nested record must be set.
    pub required: bool,
    /// Do not descend into nested records.
    pub skip: bool,
}

impl Constraints {
    /// Whether nothing at all is declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
            && self.keys.is_empty()
            && self.items.is_empty()
            && !self.required
            && !self.skip
    }
}

/// Static metadata for one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    constraints: Constraints,
}

impl FieldDescriptor {
    /// Declare a field of the given kind with no constraints.
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            constraints: Constraints::default(),
        }
    }

    /// A singular leaf field.
    pub fn scalar(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    /// A singular nested-record field.
    pub fn message(name: &'static str) -> Self {
        Self::new(name, FieldKind::Message)
    }

    /// A repeated leaf field.
    pub fn repeated(name: &'static str) -> Self {
        Self::new(name, FieldKind::RepeatedScalar)
    }

    /// A repeated nested-record field.
    pub fn repeated_messages(name: &'static str) -> Self {
        Self::new(name, FieldKind::RepeatedMessage)
    }

    /// A keyed collection field.
    pub fn map(name: &'static str) -> Self {
        Self::new(name, FieldKind::Map)
    }

    /// Append a leaf rule. Rules are evaluated in the order they are added.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.constraints.rules.push(rule);
        self
    }

    /// Append a map key rule.
    pub fn key_rule(mut self, rule: Rule) -> Self {
        self.constraints.keys.push(rule);
        self
    }

    /// Append a collection rule.
    pub fn items(mut self, rule: ItemsRule) -> Self {
        self.constraints.items.push(rule);
        self
    }

    /// Require a nested record to be set.
    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    /// Never descend into nested records of this field.
    pub fn skip(mut self) -> Self {
        self.constraints.skip = true;
        self
    }

    /// Field name as declared in the schema.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Declared constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

/// Static metadata for one record type: its name and ordered fields.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// A record type with no fields yet.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Append a field. Declaration order is validation order.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Record type name, used to namespace violations.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A schema-defined record the dispatcher can walk.
///
/// Implementors return their static descriptor and expose each declared field
/// by name. Fields the accessor does not recognise should be reported as
/// [`FieldValue::Missing`].
pub trait Record {
    /// The record type's descriptor.
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// The current value of the field called `name`.
    fn field(&self, name: &str) -> FieldValue<'_>;
}
