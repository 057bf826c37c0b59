//! Renderers for etree.
//!
//! Both renderers read an already discovered, sealed [`TreeNode`] tree and
//! never touch the filesystem:
//!
//! - [`render_pretty`] draws the tree with box-drawing connectors and a usage
//!   annotation per row, followed by a summary footer
//! - [`render_structured`] builds a nested, serializable document that
//!   [`write_structured`] prints as JSON
//!
//! The exclusion set and depth limit are applied again at render time, so the
//! same tree can be rendered in full or pruned without rescanning.
//!
//! [`TreeNode`]: etree_core::TreeNode

mod config;
mod pretty;
mod structured;
mod units;

pub use config::{RenderConfig, UsageDisplay};
pub use pretty::{PrettyRenderer, render_pretty};
pub use structured::{StructuredNode, render_structured, write_structured};
pub use units::{SizeUnits, format_size};
