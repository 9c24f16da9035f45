//! Options loader that merges file and environment sources.

use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Default priority of the first options file; later files add 10 each.
pub(crate) const FILE_PRIORITY: i32 = 100;

/// Default priority of environment overrides.
pub(crate) const ENV_PRIORITY: i32 = 300;

/// Where options are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsSource {
    /// A YAML, TOML or JSON file, detected from its extension.
    File {
        /// Path to the file.
        path: PathBuf,
        /// Higher priority sources override lower ones.
        priority: i32,
    },
    /// Environment variables such as `RECORD_GUARD_MAX_DEPTH`.
    Env {
        /// Variable prefix, without the trailing underscore.
        prefix: String,
        /// Separator for nested keys.
        separator: String,
        /// Higher priority sources override lower ones.
        priority: i32,
    },
}

impl OptionsSource {
    /// A file source with the default file priority.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        OptionsSource::File {
            path: path.into(),
            priority: FILE_PRIORITY,
        }
    }

    /// An environment source with the default environment priority.
    pub fn env(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        OptionsSource::Env {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: ENV_PRIORITY,
        }
    }

    /// Override the priority.
    pub fn with_priority(mut self, new_priority: i32) -> Self {
        match &mut self {
            OptionsSource::File { priority, .. } | OptionsSource::Env { priority, .. } => {
                *priority = new_priority
            }
        }
        self
    }

    /// Priority of this source (higher = takes precedence).
    pub fn priority(&self) -> i32 {
        match self {
            OptionsSource::File { priority, .. } | OptionsSource::Env { priority, .. } => *priority,
        }
    }

    /// Human readable name for logging.
    pub fn name(&self) -> String {
        match self {
            OptionsSource::File { path, .. } => format!("file:{}", path.display()),
            OptionsSource::Env { prefix, .. } => format!("env:{}*", prefix),
        }
    }

    fn check_extension(path: &std::path::Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                Error::LoadError(format!(
                    "Unable to determine file format for: {}",
                    path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" | "toml" | "json" => Ok(()),
            _ => Err(Error::LoadError(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }
}

/// Loads and merges options from multiple sources.
///
/// Sources are merged in priority order (lowest first), so higher priority
/// sources override values from lower priority ones.
#[derive(Debug, Clone, Default)]
pub struct OptionsLoader {
    sources: Vec<OptionsSource>,
}

impl OptionsLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source.
    pub fn add_source(&mut self, source: OptionsSource) {
        self.sources.push(source);
    }

    /// Whether no source has been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load and merge all sources into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source was added
    /// - A file has an unsupported extension or cannot be read
    /// - Deserialization fails
    pub fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if self.sources.is_empty() {
            return Err(Error::LoadError("No options sources specified".to_string()));
        }

        let mut builder = Config::builder();
        for source in self.sorted() {
            builder = match source {
                OptionsSource::File { path, .. } => {
                    OptionsSource::check_extension(path)?;
                    builder.add_source(File::from(path.as_path()).required(true))
                }
                OptionsSource::Env {
                    prefix, separator, ..
                } => builder.add_source(
                    Environment::with_prefix(prefix)
                        .prefix_separator("_")
                        .separator(separator)
                        .try_parsing(true),
                ),
            };
        }

        let config = builder
            .build()
            .map_err(|e| Error::LoadError(format!("Failed to build options: {}", e)))?;

        config
            .try_deserialize::<T>()
            .map_err(|e| Error::DeserializationError(format!("Failed to deserialize options: {}", e)))
    }

    /// Source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted().map(OptionsSource::name).collect()
    }

    fn sorted(&self) -> impl Iterator<Item = &OptionsSource> {
        let mut sorted: Vec<_> = self.sources.iter().collect();
        sorted.sort_by_key(|s| s.priority());
        sorted.into_iter()
    }
}
