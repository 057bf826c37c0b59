//! Filesystem primitives consumed by the discoverer.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use compact_str::CompactString;
use etree_core::NodeKind;

/// Size of the units reported by [`FileSystem::disk_blocks`].
pub const BLOCK_SIZE: u64 = 512;

/// One entry yielded by [`FileSystem::enumerate_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// Base file name.
    pub name: CompactString,
    /// Full path of the entry.
    pub path: PathBuf,
}

impl ChildEntry {
    /// Create an entry for `name` inside `parent`.
    pub fn new(parent: &Path, name: impl Into<CompactString>) -> Self {
        let name = name.into();
        Self {
            path: parent.join(name.as_str()),
            name,
        }
    }
}

/// The host operations discovery relies on.
///
/// Implementations must classify without following symbolic links so that a
/// link to a directory is reported as [`NodeKind::Other`] and never descended.
/// `exists` and `is_directory` only validate the scan root, which is resolved
/// through symbolic links: a link to a directory is scanned, a dangling link
/// does not exist.
pub trait FileSystem {
    /// Whether `path` resolves to an existing entry.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` resolves to a directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Immediate children of a directory, in whatever order the host yields
    /// them. No sorting is applied.
    fn enumerate_children(&self, path: &Path) -> io::Result<Vec<ChildEntry>>;

    /// Kind of the entry at `path`.
    fn classify(&self, path: &Path) -> io::Result<NodeKind>;

    /// Apparent size in bytes.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Allocated storage in [`BLOCK_SIZE`] units.
    fn disk_blocks(&self, path: &Path) -> io::Result<u64>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    /// Create a new handle to the host filesystem.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    fn is_directory(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|metadata| metadata.is_dir())
    }

    fn enumerate_children(&self, path: &Path) -> io::Result<Vec<ChildEntry>> {
        fs::read_dir(path)?
            .map(|entry| {
                let entry = entry?;
                Ok(ChildEntry {
                    name: CompactString::new(entry.file_name().to_string_lossy()),
                    path: entry.path(),
                })
            })
            .collect()
    }

    fn classify(&self, path: &Path) -> io::Result<NodeKind> {
        let file_type = fs::symlink_metadata(path)?.file_type();
        Ok(if file_type.is_file() {
            NodeKind::File
        } else if file_type.is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::Other
        })
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::symlink_metadata(path)?.len())
    }

    fn disk_blocks(&self, path: &Path) -> io::Result<u64> {
        fs::symlink_metadata(path).map(|metadata| get_blocks(&metadata))
    }
}

/// Get the number of 512-byte blocks from metadata.
#[cfg(unix)]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.blocks()
}

#[cfg(not(unix))]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.len().div_ceil(BLOCK_SIZE)
}
