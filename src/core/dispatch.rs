//! Descriptor-driven, fail-fast record walk.

use crate::core::{Validate, ValidationOptions};
use crate::error::ValidationError;
use crate::rules::{REQUIRED_REASON, Rule};
use crate::schema::{
    Constraints, Element, FieldDescriptor, FieldKind, FieldPath, FieldValue, Record, Scalar,
    describe, describe_indexed, describe_keyed,
};
use tracing::trace;

/// Per-call traversal state.
///
/// A context is created by the outermost [`Validate::validate`] call and
/// threaded through every nested record, so the depth budget applies to the
/// whole tree. It holds no shared state; each call owns its own.
#[derive(Debug, Clone)]
pub struct Context {
    depth: usize,
    max_depth: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(&ValidationOptions::default())
    }
}

impl Context {
    /// A fresh context at depth zero.
    pub fn new(options: &ValidationOptions) -> Self {
        Self {
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Current nesting depth; the outermost record is at depth zero.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Maximum nesting depth before the walk is cut off.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Walk `record`'s declared fields in order and return the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn check<R: Record + ?Sized>(&mut self, record: &R) -> Result<(), ValidationError> {
        let descriptor = record.descriptor();
        for field in descriptor.fields() {
            self.check_field(descriptor.name(), field, record.field(field.name()))?;
        }
        Ok(())
    }

    fn check_field(
        &mut self,
        record: &'static str,
        field: &FieldDescriptor,
        value: FieldValue<'_>,
    ) -> Result<(), ValidationError> {
        let name = field.name();
        let constraints = field.constraints();

        match (field.kind(), value) {
            (_, FieldValue::Missing) => {
                trace!(record, field = name, "field not exposed by record; skipping");
                Ok(())
            }
            (FieldKind::Scalar, FieldValue::Scalar(value)) => {
                check_rules(record, &constraints.rules, &value, || describe(name))
            }
            (FieldKind::Message, FieldValue::Message(nested)) => match nested {
                None if constraints.required => {
                    Err(describe(name).violation(record, REQUIRED_REASON))
                }
                None => Ok(()),
                Some(_) if constraints.skip => Ok(()),
                Some(nested) => self.descend(record, describe(name), nested),
            },
            (FieldKind::Message, FieldValue::Opaque { present }) => {
                if !present && constraints.required {
                    return Err(describe(name).violation(record, REQUIRED_REASON));
                }
                Ok(())
            }
            (
                kind @ (FieldKind::RepeatedScalar | FieldKind::RepeatedMessage),
                FieldValue::Repeated(items),
            ) => {
                if let Some(rule) = constraints
                    .items
                    .iter()
                    .find(|rule| !rule.evaluate_repeated(&items))
                {
                    return Err(describe(name).violation(record, rule.reason(kind)));
                }
                for (index, item) in items.iter().enumerate() {
                    self.check_element(record, constraints, item, || {
                        describe_indexed(name, index)
                    })?;
                }
                Ok(())
            }
            (FieldKind::Map, FieldValue::Map(mut entries)) => {
                if let Some(rule) = constraints
                    .items
                    .iter()
                    .find(|rule| !rule.evaluate_len(entries.len()))
                {
                    return Err(describe(name).violation(record, rule.reason(FieldKind::Map)));
                }
                entries.sort_by(|(a, _), (b, _)| a.cmp_key(b));
                for (key, item) in &entries {
                    check_rules(record, &constraints.keys, key, || {
                        describe_keyed(name, key, true)
                    })?;
                    self.check_element(record, constraints, item, || {
                        describe_keyed(name, key, false)
                    })?;
                }
                Ok(())
            }
            (kind, _) => {
                trace!(record, field = name, ?kind, "value shape does not match declared kind; skipping");
                Ok(())
            }
        }
    }

    fn check_element(
        &mut self,
        record: &'static str,
        constraints: &Constraints,
        item: &Element<'_>,
        path: impl FnOnce() -> FieldPath,
    ) -> Result<(), ValidationError> {
        match item {
            Element::Scalar(value) => check_rules(record, &constraints.rules, value, path),
            Element::Message(_) if constraints.skip => Ok(()),
            Element::Message(nested) => self.descend(record, path(), *nested),
            Element::Opaque => Ok(()),
        }
    }

    /// Validate a nested record one level deeper and wrap its failure.
    fn descend(
        &mut self,
        record: &'static str,
        path: FieldPath,
        nested: &dyn Validate,
    ) -> Result<(), ValidationError> {
        if self.depth >= self.max_depth {
            trace!(record, field = %path, max_depth = self.max_depth, "validation depth exceeded");
            return Err(path.violation(
                record,
                format!("validation depth exceeded (max {})", self.max_depth),
            ));
        }

        self.depth += 1;
        let outcome = nested.validate_with(self);
        self.depth -= 1;

        outcome.map_err(|cause| ValidationError::embedded(record, path.as_str(), cause))
    }
}

/// Evaluate `rules` in order; the first failing rule produces the violation.
fn check_rules(
    record: &'static str,
    rules: &[Rule],
    value: &Scalar<'_>,
    path: impl FnOnce() -> FieldPath,
) -> Result<(), ValidationError> {
    match rules.iter().find(|rule| !rule.evaluate(value)) {
        Some(rule) => Err(path().violation(record, rule.reason())),
        None => Ok(()),
    }
}
