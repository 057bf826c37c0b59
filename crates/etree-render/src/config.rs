//! Presentation settings shared by both renderers.

use strum::Display;

use crate::units::SizeUnits;

const DEFAULT_INDENT: usize = 2;

/// Which usage figures annotate each row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum UsageDisplay {
    /// Size only.
    Absolute,
    /// Percentage of the root total only.
    Relative,
    /// Size and percentage.
    #[default]
    Combined,
}

impl UsageDisplay {
    pub fn shows_size(&self) -> bool {
        matches!(self, Self::Absolute | Self::Combined)
    }

    pub fn shows_percentage(&self) -> bool {
        matches!(self, Self::Relative | Self::Combined)
    }
}

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub usage: UsageDisplay,
    pub units: SizeUnits,
    /// Emit directory rows only.
    pub dirs_only: bool,
    /// Append the non-directory descendant count to directory rows.
    pub show_child_count: bool,
    /// Print totals after the tree.
    pub summary: bool,
    pub use_color: bool,
    /// Spaces per nesting level for structured output; `None` is compact.
    pub indent: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            usage: UsageDisplay::default(),
            units: SizeUnits::default(),
            dirs_only: false,
            show_child_count: true,
            summary: true,
            use_color: false,
            indent: Some(DEFAULT_INDENT),
        }
    }
}
