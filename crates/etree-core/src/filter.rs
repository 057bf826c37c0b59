//! Exclusion and depth policy shared by discovery and rendering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Decides which entries are visited and how deep output descends.
///
/// Exclusion matches exact base file names at every depth. The depth limit
/// only ever affects rendering: discovery visits and aggregates everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Base file names skipped wherever they appear below the root.
    #[serde(default)]
    pub excludes: BTreeSet<String>,

    /// Deepest row depth that is displayed (root is depth 0).
    #[serde(default)]
    pub level: Option<usize>,
}

impl Filter {
    /// A filter that excludes nothing and never stops descending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names to the exclusion set.
    pub fn with_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Limit displayed depth to `level`.
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = Some(level);
        self
    }

    /// Check whether a name is in the exclusion set.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excludes.contains(name)
    }

    /// Whether an entry named `name` at `depth` is visited at all.
    ///
    /// The root (depth 0) is always visited, even if its own name is excluded.
    pub fn should_visit(&self, name: &str, depth: usize) -> bool {
        depth == 0 || !self.is_excluded(name)
    }

    /// Whether the children of a node at `depth` are displayed.
    pub fn should_descend(&self, depth: usize) -> bool {
        self.level.is_none_or(|level| depth < level)
    }

    /// Reject a depth limit of zero.
    pub fn validate(&self) -> Result<(), ScanError> {
        match self.level {
            Some(0) => Err(ScanError::InvalidConfig {
                message: "level must be at least 1".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
