//! Scanned tree container and statistics.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::node::TreeNode;

/// Totals accumulated once per scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total apparent size of all files, in bytes.
    pub total_size: u64,
    /// Total disk usage of all files, when tracked.
    pub total_disk_usage: Option<u64>,
    /// Number of directories below the root.
    pub directories: u64,
    /// Number of regular files.
    pub files: u64,
    /// Number of entries that are neither files nor directories.
    pub others: u64,
    /// Deepest entry depth reached (root is 0).
    pub max_depth: usize,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new(track_disk_usage: bool) -> Self {
        Self {
            total_disk_usage: track_disk_usage.then_some(0),
            ..Self::default()
        }
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, size: u64, disk_usage: Option<u64>, depth: usize) {
        self.files += 1;
        self.total_size += size;
        if let (Some(total), Some(usage)) = (self.total_disk_usage.as_mut(), disk_usage) {
            *total += usage;
        }
        self.reach(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: usize) {
        self.directories += 1;
        self.reach(depth);
    }

    /// Record an entry that is neither a file nor a directory.
    pub fn record_other(&mut self, depth: usize) {
        self.others += 1;
        self.reach(depth);
    }

    /// Total the percentages are relative to: disk usage when tracked,
    /// apparent size otherwise.
    pub fn total_usage(&self) -> u64 {
        self.total_disk_usage.unwrap_or(self.total_size)
    }

    /// Percentage of the total taken by `usage`, 0 when the total is 0.
    pub fn percentage(&self, usage: u64) -> f64 {
        let total = self.total_usage();
        if total == 0 {
            0.0
        } else {
            usage as f64 / total as f64 * 100.0
        }
    }

    fn reach(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Complete scanned tree with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTree {
    /// Root node of the tree.
    pub root: TreeNode,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Entries skipped under the best-effort policy.
    pub warnings: Vec<ScanWarning>,
}

impl FileTree {
    /// Create a new file tree.
    pub fn new(
        root: TreeNode,
        root_path: PathBuf,
        config: ScanConfig,
        stats: TreeStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            root_path,
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Get the total size of the tree.
    pub fn total_size(&self) -> u64 {
        self.stats.total_size
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_stats_default() {
        let stats = TreeStats::default();
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.files, 0);
        assert_eq!(stats.directories, 0);
        assert_eq!(stats.total_disk_usage, None);
    }

    #[test]
    fn test_tree_stats_record_file() {
        let mut stats = TreeStats::new(true);
        stats.record_file(1024, Some(4096), 2);

        assert_eq!(stats.files, 1);
        assert_eq!(stats.total_size, 1024);
        assert_eq!(stats.total_disk_usage, Some(4096));
        assert_eq!(stats.total_usage(), 4096);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_percentage_of_empty_total_is_zero() {
        let stats = TreeStats::new(false);
        let pct = stats.percentage(0);
        assert_eq!(pct, 0.0);
        assert!(!pct.is_nan());
    }

    #[test]
    fn test_percentage_relative_to_total() {
        let mut stats = TreeStats::new(false);
        stats.record_file(100, None, 1);
        stats.record_file(300, None, 2);
        assert_eq!(format!("{:.2}", stats.percentage(300)), "75.00");
    }
}
