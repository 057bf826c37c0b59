//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::filter::Filter;

/// Which size figure the scan records for files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SizeMode {
    /// Logical byte length only.
    #[default]
    Apparent,
    /// Also record allocated blocks, and report those instead.
    DiskUsage,
}

/// What discovery does when an entry cannot be inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort the scan and return the error.
    #[default]
    FailFast,
    /// Keep the entry as an `Other` node without size, record a warning and
    /// continue.
    BestEffort,
}

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Exclusion set and display depth.
    #[builder(default)]
    #[serde(default)]
    pub filter: Filter,

    /// Apparent size vs disk usage.
    #[builder(default)]
    #[serde(default)]
    pub size_mode: SizeMode,

    /// Failure handling for individual entries.
    #[builder(default)]
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(ref filter) = self.filter {
            filter.validate().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: Filter::default(),
            size_mode: SizeMode::default(),
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Whether disk usage is recorded alongside apparent size.
    pub fn tracks_disk_usage(&self) -> bool {
        self.size_mode == SizeMode::DiskUsage
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
