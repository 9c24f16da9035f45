//! Validation entry points, dispatch and options.

mod builder;
mod dispatch;
mod guard;
mod loader;
mod options;
mod validation;

pub use builder::GuardBuilder;
pub use dispatch::Context;
pub use guard::Guard;
pub use loader::{OptionsLoader, OptionsSource};
pub use options::{DEFAULT_MAX_DEPTH, ValidationOptions};
pub use validation::{Validate, ValidateExt};
