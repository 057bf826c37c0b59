//! Depth-first layout discoverer.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use compact_str::CompactString;
use tracing::{debug, trace, warn};

use etree_core::{
    ErrorPolicy, FileTree, NodeKind, ScanConfig, ScanError, ScanWarning, Subtotals, TreeNode,
    TreeStats,
};

use crate::fs::{BLOCK_SIZE, ChildEntry, FileSystem, OsFileSystem};

/// Single-threaded scanner that builds a sealed [`TreeNode`] tree.
///
/// Each directory is enumerated once, its children are visited in the order
/// the filesystem yields them, and its aggregates are sealed after the last
/// child returns.
pub struct Discoverer<F = OsFileSystem> {
    fs: F,
    cancel: Option<Arc<AtomicBool>>,
}

/// Mutable state threaded through one scan.
struct Walk<'a> {
    config: &'a ScanConfig,
    stats: TreeStats,
    warnings: Vec<ScanWarning>,
}

impl Discoverer<OsFileSystem> {
    /// Create a discoverer over the host filesystem.
    pub fn new() -> Self {
        Self::with_filesystem(OsFileSystem::new())
    }
}

impl Default for Discoverer<OsFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> Discoverer<F> {
    /// Create a discoverer over a custom filesystem.
    pub fn with_filesystem(fs: F) -> Self {
        Self { fs, cancel: None }
    }

    /// Abort with [`ScanError::Interrupted`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scan `config.root` and return the sealed tree with its statistics.
    pub fn discover(&self, config: &ScanConfig) -> Result<FileTree, ScanError> {
        let start = Instant::now();
        let root_path = config.root.as_path();

        config.filter.validate()?;
        if !self.fs.exists(root_path) {
            return Err(ScanError::NotFound {
                path: root_path.to_path_buf(),
            });
        }
        if !self.fs.is_directory(root_path) {
            return Err(ScanError::NotADirectory {
                path: root_path.to_path_buf(),
            });
        }

        debug!(
            root = %root_path.display(),
            size_mode = %config.size_mode,
            error_policy = %config.error_policy,
            "starting scan"
        );

        let mut walk = Walk {
            config,
            stats: TreeStats::new(config.tracks_disk_usage()),
            warnings: Vec::new(),
        };
        let root = self.discover_dir(&mut walk, root_name(root_path), root_path, 0)?;

        let scan_duration = start.elapsed();
        debug!(
            files = walk.stats.files,
            directories = walk.stats.directories,
            others = walk.stats.others,
            total_size = walk.stats.total_size,
            warnings = walk.warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan finished"
        );

        Ok(FileTree::new(
            root,
            root_path.to_path_buf(),
            config.clone(),
            walk.stats,
            scan_duration,
            walk.warnings,
        ))
    }

    /// Enumerate one directory, visit its children and seal it.
    fn discover_dir(
        &self,
        walk: &mut Walk<'_>,
        name: CompactString,
        path: &Path,
        depth: usize,
    ) -> Result<TreeNode, ScanError> {
        let entries = self
            .fs
            .enumerate_children(path)
            .map_err(|e| ScanError::io(path, e))?;

        let mut node = TreeNode::new_directory(name);
        let mut totals = Subtotals::new(walk.config.tracks_disk_usage());
        let child_depth = depth + 1;

        for entry in entries {
            self.check_cancelled()?;

            if !walk.config.filter.should_visit(&entry.name, child_depth) {
                trace!(path = %entry.path.display(), "excluded");
                continue;
            }

            let child = match self.discover_entry(walk, &entry, child_depth) {
                Ok(child) => child,
                Err(err)
                    if walk.config.error_policy == ErrorPolicy::BestEffort
                        && err.is_entry_failure() =>
                {
                    warn!(path = %entry.path.display(), error = %err, "skipping entry");
                    walk.warnings.push(ScanWarning::skipped(&entry.path, &err));
                    walk.stats.record_other(child_depth);
                    TreeNode::new_other(entry.name)
                }
                Err(err) => return Err(err),
            };

            totals.add(&child);
            node.children.push(child);
        }

        node.seal(totals);
        Ok(node)
    }

    /// Classify one surviving entry and build its node.
    fn discover_entry(
        &self,
        walk: &mut Walk<'_>,
        entry: &ChildEntry,
        depth: usize,
    ) -> Result<TreeNode, ScanError> {
        let path = entry.path.as_path();
        let kind = self.fs.classify(path).map_err(|e| ScanError::io(path, e))?;
        trace!(path = %path.display(), %kind, depth, "visit");

        match kind {
            NodeKind::File => {
                let size = self.fs.size(path).map_err(|e| ScanError::io(path, e))?;
                let disk_usage = if walk.config.tracks_disk_usage() {
                    let blocks = self
                        .fs
                        .disk_blocks(path)
                        .map_err(|e| ScanError::io(path, e))?;
                    Some(blocks * BLOCK_SIZE)
                } else {
                    None
                };
                walk.stats.record_file(size, disk_usage, depth);
                Ok(TreeNode::new_file(entry.name.clone(), size, disk_usage))
            }
            NodeKind::Directory => {
                let node = self.discover_dir(walk, entry.name.clone(), path, depth)?;
                walk.stats.record_dir(depth);
                Ok(node)
            }
            NodeKind::Other => {
                walk.stats.record_other(depth);
                Ok(TreeNode::new_other(entry.name.clone()))
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), ScanError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(ScanError::Interrupted),
            _ => Ok(()),
        }
    }
}

/// Name shown for the scanned root: its base name, or the path itself when
/// it has none (`.`, `/`).
fn root_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etree_core::{Filter, SizeMode};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), vec![b'a'; 100]).unwrap();
        fs::write(root.join("sub/b.txt"), vec![b'b'; 300]).unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let tree = Discoverer::new()
            .discover(&ScanConfig::new(temp.path()))
            .unwrap();

        assert_eq!(tree.stats.total_size, 400);
        assert_eq!(tree.stats.files, 2);
        assert_eq!(tree.stats.directories, 1);
        assert_eq!(tree.stats.max_depth, 2);
        assert_eq!(tree.root.size, Some(400));
        assert_eq!(tree.root.child_count, 2);
        assert_eq!(tree.root.find("sub").unwrap().size, Some(300));
        assert!(!tree.has_warnings());
    }

    #[test]
    fn test_exclusion_contributes_nothing() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .filter(Filter::new().with_excludes(["b.txt"]))
            .build()
            .unwrap();

        let tree = Discoverer::new().discover(&config).unwrap();

        let sub = tree.root.find("sub").unwrap();
        assert!(sub.children.is_empty());
        assert_eq!(sub.size, Some(0));
        assert_eq!(sub.child_count, 0);
        assert_eq!(tree.root.size, Some(100));
        assert_eq!(tree.stats.files, 1);
    }

    #[test]
    fn test_level_does_not_truncate_aggregation() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .filter(Filter::new().with_level(1))
            .build()
            .unwrap();

        let tree = Discoverer::new().discover(&config).unwrap();

        assert_eq!(tree.root.find("sub/b.txt").unwrap().size, Some(300));
        assert_eq!(tree.stats.total_size, 400);
    }

    #[test]
    fn test_disk_usage_mode() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .size_mode(SizeMode::DiskUsage)
            .build()
            .unwrap();

        let tree = Discoverer::new().discover(&config).unwrap();

        let usage = tree.root.disk_usage.unwrap();
        assert_eq!(usage % BLOCK_SIZE, 0);
        assert_eq!(tree.stats.total_disk_usage, Some(usage));
        assert_eq!(tree.root.size, Some(400));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = Discoverer::new()
            .discover(&ScanConfig::new(temp.path().join("nope")))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_root_is_file() {
        let temp = create_test_tree();
        let err = Discoverer::new()
            .discover(&ScanConfig::new(temp.path().join("a.txt")))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_parent_is_not_followed() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink("..", temp.path().join("sub/parent")).unwrap();

        let tree = Discoverer::new()
            .discover(&ScanConfig::new(temp.path()))
            .unwrap();

        let link = tree.root.find("sub/parent").unwrap();
        assert!(link.is_other());
        assert!(link.children.is_empty());
        assert_eq!(tree.stats.others, 1);
        assert_eq!(tree.root.size, Some(400));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root() {
        let temp = create_test_tree();
        let outside = TempDir::new().unwrap();
        let link = outside.path().join("link");
        let dangling = outside.path().join("dangling");
        std::os::unix::fs::symlink(temp.path(), &link).unwrap();
        std::os::unix::fs::symlink(outside.path().join("nowhere"), &dangling).unwrap();

        let tree = Discoverer::new().discover(&ScanConfig::new(&link)).unwrap();
        assert_eq!(tree.root.name, "link");
        assert_eq!(tree.root.size, Some(400));

        let err = Discoverer::new()
            .discover(&ScanConfig::new(&dangling))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_root_name() {
        assert_eq!(root_name(Path::new("/tmp/project")), "project");
        assert_eq!(root_name(Path::new(".")), ".");
        assert_eq!(root_name(Path::new("/")), "/");
    }
}
