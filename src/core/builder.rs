//! Builder for constructing Guard instances.

use crate::core::loader::FILE_PRIORITY;
use crate::core::{Guard, OptionsLoader, OptionsSource, ValidationOptions};
use crate::error::Result;
use std::path::PathBuf;

/// Builder for constructing a [`Guard`].
///
/// Options come from files and environment variables, merged with the usual
/// precedence (later files over earlier ones, environment over files). With no
/// sources the defaults are used.
///
/// # Examples
///
/// ```rust,no_run
/// use record_guard::prelude::*;
///
/// # fn example() -> record_guard::error::Result<()> {
/// let guard = Guard::builder()
///     .with_file("config/validation.yaml")
///     .with_env_overrides("RECORD_GUARD", "__")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct GuardBuilder {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    max_depth: Option<usize>,
}

impl GuardBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an options file (YAML, TOML or JSON).
    ///
    /// Files are added in the order they are specified. Later files have
    /// higher priority and override earlier files.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Read overrides from environment variables.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "RECORD_GUARD")
    /// * `separator` - Separator for nested keys (e.g., "__")
    ///
    /// `RECORD_GUARD_MAX_DEPTH=8` sets `max_depth = 8`.
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Fix the maximum nesting depth, overriding every source.
    ///
    /// The override also applies to every later [`Guard::reload`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Load the options and build the guard.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be loaded or deserialized.
    pub fn build(self) -> Result<Guard> {
        let mut loader = OptionsLoader::new();

        for (index, path) in self.file_paths.into_iter().enumerate() {
            let priority = FILE_PRIORITY + (index as i32 * 10);
            loader.add_source(OptionsSource::file(path).with_priority(priority));
        }

        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(OptionsSource::env(prefix, separator));
        }

        if loader.is_empty() {
            let mut options = ValidationOptions::default();
            if let Some(max_depth) = self.max_depth {
                options.max_depth = max_depth;
            }
            return Ok(Guard::new(options));
        }

        let mut options: ValidationOptions = loader.load()?;
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }

        Ok(Guard::with_loader(options, loader, self.max_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_files() {
        let builder = GuardBuilder::new()
            .with_file("a.yaml")
            .with_file("b.yaml")
            .with_file("c.yaml");

        assert_eq!(builder.file_paths.len(), 3);
    }

    #[test]
    fn test_builder_env_overrides() {
        let builder = GuardBuilder::new().with_env_overrides("RECORD_GUARD", "__");

        assert_eq!(builder.env_prefix, Some("RECORD_GUARD".to_string()));
        assert_eq!(builder.env_separator, Some("__".to_string()));
    }

    #[test]
    fn test_build_without_sources_uses_defaults() {
        let guard = GuardBuilder::new().build().unwrap();
        assert_eq!(*guard.options(), ValidationOptions::default());

        let guard = GuardBuilder::new().with_max_depth(2).build().unwrap();
        assert_eq!(guard.options().max_depth, 2);
    }
}
