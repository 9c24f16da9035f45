//! Envelope guard used by the request-handling layer.

use crate::core::{Context, OptionsLoader, Validate, ValidationOptions};
use crate::error::{Error, Result, ValidationError};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};

/// Validates inbound requests and outbound responses with shared options.
///
/// The options live behind an `arc-swap`, so they can be replaced or reloaded
/// while other threads keep validating; every call sees one consistent
/// snapshot. Cloning a guard is cheap and clones share the same options.
///
/// # Examples
///
/// ```rust
/// use record_guard::prelude::*;
///
/// let guard = Guard::new(ValidationOptions::default().with_max_depth(8));
/// assert_eq!(guard.options().max_depth, 8);
///
/// // An absent envelope is never rejected.
/// let request: Option<Box<dyn Validate>> = None;
/// assert!(guard.check_request(&request).is_ok());
/// ```
#[derive(Clone)]
pub struct Guard {
    current: Arc<ArcSwap<ValidationOptions>>,
    loader: Option<Arc<OptionsLoader>>,
    max_depth: Option<usize>,
}

impl Guard {
    /// A guard with fixed initial options and no reload source.
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(options)),
            loader: None,
            max_depth: None,
        }
    }

    /// A guard that can re-read its options from `loader`.
    ///
    /// A `max_depth` override is applied on top of every load.
    pub(crate) fn with_loader(
        options: ValidationOptions,
        loader: OptionsLoader,
        max_depth: Option<usize>,
    ) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(options)),
            loader: Some(Arc::new(loader)),
            max_depth,
        }
    }

    /// Create a new builder.
    pub fn builder() -> crate::core::GuardBuilder {
        crate::core::GuardBuilder::new()
    }

    /// Snapshot of the current options.
    pub fn options(&self) -> Arc<ValidationOptions> {
        self.current.load_full()
    }

    /// Atomically replace the options.
    pub fn set_options(&self, options: ValidationOptions) {
        info!(max_depth = options.max_depth, "validation options replaced");
        self.current.store(Arc::new(options));
    }

    /// Re-read the options from the configured sources.
    ///
    /// A depth fixed with [`GuardBuilder::with_max_depth`](crate::core::GuardBuilder::with_max_depth)
    /// still wins over the sources. If loading fails the current options are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the guard has no sources, or if loading or
    /// deserialization fails.
    pub fn reload(&self) -> Result<()> {
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| Error::Other("No options sources available for reload".to_string()))?;

        let mut options: ValidationOptions = loader.load()?;
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        info!(max_depth = options.max_depth, "validation options reloaded");
        self.current.store(Arc::new(options));
        Ok(())
    }

    /// Validate `record` with the current options.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn check<T: Validate + ?Sized>(&self, record: &T) -> std::result::Result<(), ValidationError> {
        let options = self.current.load();
        record.validate_with(&mut Context::new(&options))
    }

    /// Validate an inbound request before it is dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] carrying the violation.
    pub fn check_request<T: Validate + ?Sized>(&self, request: &T) -> Result<()> {
        self.check(request).map_err(|violation| {
            debug!(error_name = %violation.error_name(), path = %violation.path(), "request rejected");
            Error::ValidationError(violation)
        })
    }

    /// Validate an outbound response before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] carrying the violation.
    pub fn check_response<T: Validate + ?Sized>(&self, response: &T) -> Result<()> {
        self.check(response).map_err(|violation| {
            debug!(error_name = %violation.error_name(), path = %violation.path(), "response rejected");
            Error::ValidationError(violation)
        })
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}
