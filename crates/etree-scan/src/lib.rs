//! Directory discovery and size aggregation for etree.
//!
//! This crate walks a single directory root depth-first and builds the
//! in-memory tree that the renderers consume.
//!
//! # Overview
//!
//! - **Post-order aggregation**: every directory's size, disk usage and
//!   child count are sealed once its whole subtree has been visited
//! - **Exclusion by name** at every depth, applied before an entry is visited
//! - **No symlink following**: links are reported as `Other` entries
//! - **Explicit failure policy**: fail-fast (default) or best-effort
//!
//! Children keep the order the filesystem yields them in; nothing is sorted.
//!
//! # Example
//!
//! ```rust,no_run
//! use etree_scan::{Discoverer, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let tree = Discoverer::new().discover(&config).unwrap();
//!
//! println!("Total size: {} bytes", tree.total_size());
//! println!("Total files: {}", tree.stats.files);
//! ```

mod fs;
mod scanner;

pub use fs::{BLOCK_SIZE, ChildEntry, FileSystem, OsFileSystem};
pub use scanner::Discoverer;

// Re-export core types for convenience
pub use etree_core::{
    ErrorPolicy, FileTree, Filter, NodeKind, ScanConfig, ScanError, ScanWarning, SizeMode,
    TreeNode, TreeStats, WarningKind,
};
