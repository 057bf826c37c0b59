//! Core types for etree.
//!
//! This crate provides the data structures shared by the scanner and the
//! renderers: the sealed [`TreeNode`] tree, the per-run [`TreeStats`]
//! accumulator, the exclusion/depth [`Filter`], scan configuration and the
//! error taxonomy.

mod config;
mod error;
mod filter;
mod node;
mod tree;

pub use config::{ErrorPolicy, ScanConfig, ScanConfigBuilder, SizeMode};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use filter::Filter;
pub use node::{NodeKind, Subtotals, TreeNode};
pub use tree::{FileTree, TreeStats};
