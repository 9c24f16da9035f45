//! Tunables for a validation walk.

use serde::{Deserialize, Serialize};

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options applied to one validation call.
///
/// Options deserialize from any source the `config` crate understands; missing
/// keys fall back to their defaults.
///
/// ```yaml
/// max_depth: 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// How many nested records may be entered below the outermost one.
    ///
    /// Descending past this depth yields a `validation depth exceeded`
    /// violation instead of recursing further, which bounds the walk on cyclic
    /// or pathologically deep record graphs.
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationOptions {
    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
