//! Tree-drawing renderer.
//!
//! Rows are written pre-order in the stored child order. Each row's prefix is
//! derived from whether every ancestor was the last visible child of its own
//! parent.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use itertools::{Itertools, Position};
use tracing::debug;

use etree_core::{Filter, NodeKind, TreeNode, TreeStats};

use crate::config::RenderConfig;

const TEE: &str = "├── ";
const ELBOW: &str = "└── ";
const BAR: &str = "│   ";
const BLANK: &str = "    ";

const DIR_COLOR: Color = Color::Blue;
const OTHER_COLOR: Color = Color::Cyan;
const USAGE_COLOR: Color = Color::Green;

/// Formatter for the annotated tree view.
pub struct PrettyRenderer<'a> {
    config: &'a RenderConfig,
    filter: &'a Filter,
    stats: &'a TreeStats,
}

impl<'a> PrettyRenderer<'a> {
    pub fn new(config: &'a RenderConfig, filter: &'a Filter, stats: &'a TreeStats) -> Self {
        Self {
            config,
            filter,
            stats,
        }
    }

    /// Write the tree, then the summary footer if enabled.
    pub fn render<W: Write>(&self, root: &TreeNode, out: &mut W) -> io::Result<()> {
        let mut lasts = Vec::new();
        self.write_node(out, root, 0, &mut lasts)?;
        if self.config.summary {
            self.write_summary(out)?;
        }
        Ok(())
    }

    /// Render into a string.
    pub fn format(&self, root: &TreeNode) -> String {
        let mut buf = Vec::new();
        self.render(root, &mut buf)
            .expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_node<W: Write>(
        &self,
        out: &mut W,
        node: &TreeNode,
        depth: usize,
        lasts: &mut Vec<bool>,
    ) -> io::Result<()> {
        self.write_row(out, node, lasts)?;

        if !node.is_dir() || !self.filter.should_descend(depth) {
            return Ok(());
        }

        let child_depth = depth + 1;
        let visible = node.children.iter().filter(|child| {
            self.filter.should_visit(&child.name, child_depth)
                && (!self.config.dirs_only || child.is_dir())
        });

        for (position, child) in visible.with_position() {
            lasts.push(matches!(position, Position::Last | Position::Only));
            self.write_node(out, child, child_depth, lasts)?;
            lasts.pop();
        }
        Ok(())
    }

    fn write_row<W: Write>(&self, out: &mut W, node: &TreeNode, lasts: &[bool]) -> io::Result<()> {
        if let Some((is_last, ancestors)) = lasts.split_last() {
            for &ancestor_last in ancestors {
                out.write_all(if ancestor_last { BLANK } else { BAR }.as_bytes())?;
            }
            out.write_all(if *is_last { ELBOW } else { TEE }.as_bytes())?;
        }

        match node.kind {
            NodeKind::Directory => {
                write!(out, "{}", self.paint(&dir_label(&node.name), DIR_COLOR, true))?;
            }
            NodeKind::File => write!(out, "{}", node.name)?,
            NodeKind::Other => {
                let label = format!("{} ?", node.name);
                return writeln!(out, "{}", self.paint(&label, OTHER_COLOR, false));
            }
        }

        match self.annotation(node) {
            Some(annotation) => writeln!(out, " {}", self.paint(&annotation, USAGE_COLOR, false)),
            None => writeln!(out),
        }
    }

    /// `[ <size>, <pct>%, <count> ]`, trimmed to what the config asks for.
    fn annotation(&self, node: &TreeNode) -> Option<String> {
        let usage = node.usage()?;
        let mut parts = Vec::with_capacity(3);

        if self.config.usage.shows_size() {
            parts.push(self.config.units.format(usage));
        }
        if self.config.usage.shows_percentage() {
            parts.push(format!("{:.2}%", self.stats.percentage(usage)));
        }
        if node.is_dir() && self.config.show_child_count {
            parts.push(node.child_count.to_string());
        }

        if parts.is_empty() {
            None
        } else {
            Some(format!("[ {} ]", parts.join(", ")))
        }
    }

    fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let stats = self.stats;
        let label = if stats.total_disk_usage.is_some() {
            "Total disk usage"
        } else {
            "Total size"
        };

        writeln!(out)?;
        writeln!(out, "{label}: {}", self.config.units.format(stats.total_usage()))?;
        writeln!(out, "Number of directories: {}", stats.directories)?;
        writeln!(out, "Number of files: {}", stats.files)?;
        writeln!(out, "Number of other file-like objects: {}", stats.others)?;
        writeln!(out, "Maximum depth: {}", stats.max_depth)
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.config.use_color {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

fn dir_label(name: &str) -> String {
    if name.ends_with('/') {
        name.to_string()
    } else {
        format!("{name}/")
    }
}

/// Draw `root` as an annotated tree into `out`.
pub fn render_pretty<W: Write>(
    root: &TreeNode,
    stats: &TreeStats,
    filter: &Filter,
    config: &RenderConfig,
    out: &mut W,
) -> io::Result<()> {
    debug!(
        dirs_only = config.dirs_only,
        level = ?filter.level,
        color = config.use_color,
        "Rendering tree view"
    );
    PrettyRenderer::new(config, filter, stats).render(root, out)
}
