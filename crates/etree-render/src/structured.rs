//! Nested document output.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use etree_core::{Filter, NodeKind, TreeNode, TreeStats};

use crate::config::RenderConfig;

/// One entry of the structured document, mirroring a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredNode {
    pub name: String,
    pub kind: NodeKind,
    /// `None` for entries without a measurable size.
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<u64>,
    /// Share of the root total, in percent.
    pub percentage: Option<f64>,
    pub child_count: u64,
    #[serde(default)]
    pub children: Vec<StructuredNode>,
}

/// Build the document for `root`, applying the same visibility rules as the
/// tree view. Values are copied from the aggregated tree unchanged.
pub fn render_structured(
    root: &TreeNode,
    stats: &TreeStats,
    filter: &Filter,
    config: &RenderConfig,
) -> StructuredNode {
    debug!(dirs_only = config.dirs_only, level = ?filter.level, "Building structured document");
    build_node(root, 0, stats, filter, config)
}

fn build_node(
    node: &TreeNode,
    depth: usize,
    stats: &TreeStats,
    filter: &Filter,
    config: &RenderConfig,
) -> StructuredNode {
    let children = if node.is_dir() && filter.should_descend(depth) {
        node.children
            .iter()
            .filter(|child| {
                filter.should_visit(&child.name, depth + 1) && (!config.dirs_only || child.is_dir())
            })
            .map(|child| build_node(child, depth + 1, stats, filter, config))
            .collect()
    } else {
        Vec::new()
    };

    StructuredNode {
        name: node.name.to_string(),
        kind: node.kind,
        size: node.size,
        disk_usage: node.disk_usage,
        percentage: node.usage().map(|usage| stats.percentage(usage)),
        child_count: node.child_count,
        children,
    }
}

/// Serialize `doc` as JSON followed by a newline.
///
/// `Some(n)` indents each level by `n` spaces; `None` writes a single line.
pub fn write_structured<W: Write>(
    doc: &StructuredNode,
    indent: Option<usize>,
    out: &mut W,
) -> io::Result<()> {
    match indent {
        Some(width) => {
            let spaces = " ".repeat(width);
            let formatter = PrettyFormatter::with_indent(spaces.as_bytes());
            let mut serializer = Serializer::with_formatter(&mut *out, formatter);
            doc.serialize(&mut serializer)?;
        }
        None => serde_json::to_writer(&mut *out, doc)?,
    }
    writeln!(out)
}
