//! File and directory node types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Type of file system node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Anything else: symlinks, devices, sockets, fifos, and entries that
    /// could not be classified under the best-effort policy.
    Other,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Check if this is neither a file nor a directory.
    pub fn is_other(&self) -> bool {
        matches!(self, NodeKind::Other)
    }
}

/// A single entry in the scanned tree.
///
/// Directory aggregates (`size`, `disk_usage`, `child_count`) are written
/// once by [`TreeNode::seal`] after the whole subtree has been visited.
/// Before that a directory reports `size == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Base file name (not the full path).
    pub name: CompactString,

    /// Node type.
    pub kind: NodeKind,

    /// Apparent size in bytes (aggregate for directories, `None` for other).
    pub size: Option<u64>,

    /// Allocated bytes, only present when the scan tracks disk usage.
    pub disk_usage: Option<u64>,

    /// Number of non-directory descendants (1 for files and other entries).
    pub child_count: u64,

    /// Children in enumeration order. Always empty for non-directories.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new file node.
    pub fn new_file(name: impl Into<CompactString>, size: u64, disk_usage: Option<u64>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            size: Some(size),
            disk_usage,
            child_count: 1,
            children: Vec::new(),
        }
    }

    /// Create a new, unsealed directory node.
    pub fn new_directory(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            size: None,
            disk_usage: None,
            child_count: 0,
            children: Vec::new(),
        }
    }

    /// Create a node for an entry that is neither a file nor a directory.
    pub fn new_other(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Other,
            size: None,
            disk_usage: None,
            child_count: 1,
            children: Vec::new(),
        }
    }

    /// Build a sealed directory straight from already sealed children.
    pub fn directory_with(
        name: impl Into<CompactString>,
        children: Vec<TreeNode>,
        track_disk_usage: bool,
    ) -> Self {
        let mut totals = Subtotals::new(track_disk_usage);
        for child in &children {
            totals.add(child);
        }

        let mut node = Self::new_directory(name);
        node.children = children;
        node.seal(totals);
        node
    }

    /// Write the directory aggregates from the running subtotals.
    pub fn seal(&mut self, totals: Subtotals) {
        debug_assert!(self.kind.is_dir(), "only directories carry aggregates");
        self.size = Some(totals.size);
        self.disk_usage = totals.disk_usage;
        self.child_count = totals.child_count;
    }

    /// Whether the aggregate fields may be read.
    pub fn is_sealed(&self) -> bool {
        match self.kind {
            NodeKind::Directory => self.size.is_some(),
            NodeKind::File | NodeKind::Other => true,
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this node is neither a file nor a directory.
    pub fn is_other(&self) -> bool {
        self.kind.is_other()
    }

    /// The figure reported for this node: disk usage when tracked,
    /// apparent size otherwise. `None` for other entries.
    pub fn usage(&self) -> Option<u64> {
        self.disk_usage.or(self.size)
    }

    /// How many countable entries this node adds to its parent's
    /// `child_count`.
    pub fn countable(&self) -> u64 {
        match self.kind {
            NodeKind::Directory => self.child_count,
            NodeKind::File | NodeKind::Other => 1,
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follow a `/`-separated path of child names from this node.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.child(part))
    }
}

/// Running totals for one directory while its children are enumerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Subtotals {
    /// Sum of the children's apparent sizes.
    pub size: u64,
    /// Sum of the children's disk usage, when tracked.
    pub disk_usage: Option<u64>,
    /// Sum of the children's countable entries.
    pub child_count: u64,
}

impl Subtotals {
    /// Empty totals; `track_disk_usage` decides whether `disk_usage` is summed.
    pub fn new(track_disk_usage: bool) -> Self {
        Self {
            size: 0,
            disk_usage: track_disk_usage.then_some(0),
            child_count: 0,
        }
    }

    /// Fold a sealed child into the totals.
    pub fn add(&mut self, child: &TreeNode) {
        self.size += child.size.unwrap_or(0);
        if let Some(total) = self.disk_usage.as_mut() {
            *total += child.disk_usage.unwrap_or(0);
        }
        self.child_count += child.countable();
    }
}
