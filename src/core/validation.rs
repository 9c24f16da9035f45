//! The validation capability exposed by every record type.

use crate::core::{Context, ValidationOptions};
use crate::error::ValidationError;
use std::sync::Arc;

/// Trait for record validation.
///
/// Implement this trait on record types so that parent records can delegate to
/// them without knowing their concrete type. For descriptor-driven records the
/// implementation is a single call into the dispatcher.
///
/// # Examples
///
/// ```rust
/// use record_guard::prelude::*;
/// use record_guard::rules::Rule;
/// use std::sync::LazyLock;
///
/// struct Timestamp {
///     seconds: i64,
///     nanos: i32,
/// }
///
/// static TIMESTAMP: LazyLock<RecordDescriptor> = LazyLock::new(|| {
///     RecordDescriptor::new("Timestamp")
///         .field(FieldDescriptor::scalar("Seconds").rule(Rule::Gte(0.into())))
///         .field(FieldDescriptor::scalar("Nanos").rule(Rule::Lt(1_000_000_000.into())))
/// });
///
/// impl Record for Timestamp {
///     fn descriptor(&self) -> &'static RecordDescriptor {
///         &TIMESTAMP
///     }
///
///     fn field(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "Seconds" => FieldValue::scalar(self.seconds),
///             "Nanos" => FieldValue::scalar(self.nanos),
///             _ => FieldValue::Missing,
///         }
///     }
/// }
///
/// impl Validate for Timestamp {
///     fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
///         ctx.check(self)
///     }
/// }
///
/// let err = Timestamp { seconds: -1, nanos: 0 }.validate().unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "invalid Timestamp.Seconds: value must be greater than or equal to 0"
/// );
/// ```
pub trait Validate {
    /// Validate using an existing traversal context.
    ///
    /// Nested records are validated through this method so that the depth
    /// budget of the outermost call is shared by the whole walk.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, in field declaration order.
    fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError>;

    /// Validate with default options.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, in field declaration order.
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&mut Context::default())
    }
}

/// An unset record is always valid; required-ness belongs to the containing field.
impl<T: Validate> Validate for Option<T> {
    fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
        match self {
            Some(inner) => inner.validate_with(ctx),
            None => Ok(()),
        }
    }
}

impl<T: Validate + ?Sized> Validate for &T {
    fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
        (**self).validate_with(ctx)
    }
}

impl<T: Validate + ?Sized> Validate for Box<T> {
    fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
        (**self).validate_with(ctx)
    }
}

impl<T: Validate + ?Sized> Validate for Arc<T> {
    fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
        (**self).validate_with(ctx)
    }
}

/// Convenience methods for anything that can validate itself.
pub trait ValidateExt: Validate {
    /// Validate with explicit options.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    fn validate_with_options(&self, options: &ValidationOptions) -> Result<(), ValidationError> {
        self.validate_with(&mut Context::new(options))
    }

    /// Validate and hand the value back on success.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    fn validated(self) -> Result<Self, ValidationError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

impl<T: Validate + ?Sized> ValidateExt for T {}
