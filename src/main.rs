//! etree - Show a directory tree annotated with disk usage.
//!
//! Usage:
//!   etree [DIRECTORY]          Tree view with sizes and percentages
//!   etree -j 2 [DIRECTORY]     Same tree as indented JSON
//!   etree -L 2 -I target .     Two levels deep, skipping `target`
//!   etree --help               Show help

use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use etree_render::{
    RenderConfig, SizeUnits, UsageDisplay, render_pretty, render_structured, write_structured,
};
use etree_scan::{Discoverer, ErrorPolicy, FileTree, Filter, ScanConfig, SizeMode};

const LOG_ENV: &str = "ETREE_LOG";

#[derive(Parser)]
#[command(
    name = "etree",
    version,
    about = "Show a directory tree annotated with disk usage",
    long_about = "etree walks a directory, totals the size of everything below it and \
                  prints the result as a tree where every row carries its size and its \
                  share of the whole.\n\n\
                  Set ETREE_LOG (e.g. `ETREE_LOG=debug`) to control diagnostics on stderr."
)]
struct Cli {
    /// Directory to inspect
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Print sizes in bytes
    #[arg(short, long)]
    bytes: bool,

    /// Print directories only
    #[arg(short, long)]
    dirs_only: bool,

    /// Print output as JSON with indentation INDENT (negative for compact)
    #[arg(short, long, value_name = "INDENT", allow_negative_numbers = true)]
    json: Option<i64>,

    /// Exclude files or directories by name
    #[arg(short = 'I', long, value_name = "NAME")]
    exclude: Vec<String>,

    /// Descend LEVEL directories deep
    #[arg(short = 'L', long, value_parser = clap::value_parser!(u64).range(1..))]
    level: Option<u64>,

    /// Show only relative usage
    #[arg(short, long, conflicts_with = "absolute")]
    relative: bool,

    /// Show only absolute usage
    #[arg(short, long)]
    absolute: bool,

    /// Report disk usage instead of apparent size
    #[arg(short = 'u', long)]
    disk_usage: bool,

    /// Skip unreadable entries instead of aborting
    #[arg(long)]
    best_effort: bool,

    /// When to use colors
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: ColorChoice,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        }
    }
}

impl Cli {
    fn filter(&self) -> Filter {
        let filter = Filter::new().with_excludes(self.exclude.iter().cloned());
        match self.level {
            Some(level) => filter.with_level(level as usize),
            None => filter,
        }
    }

    fn scan_config(&self, filter: Filter) -> Result<ScanConfig> {
        let config = ScanConfig::builder()
            .root(strip_trailing_separator(&self.directory))
            .filter(filter)
            .size_mode(if self.disk_usage {
                SizeMode::DiskUsage
            } else {
                SizeMode::Apparent
            })
            .error_policy(if self.best_effort {
                ErrorPolicy::BestEffort
            } else {
                ErrorPolicy::FailFast
            })
            .build()?;
        Ok(config)
    }

    fn render_config(&self) -> RenderConfig {
        let usage = if self.relative {
            UsageDisplay::Relative
        } else if self.absolute {
            UsageDisplay::Absolute
        } else {
            UsageDisplay::Combined
        };

        RenderConfig {
            usage,
            units: if self.bytes {
                SizeUnits::Bytes
            } else {
                SizeUnits::Human
            },
            dirs_only: self.dirs_only,
            use_color: self.json.is_none() && self.color.enabled(),
            indent: self
                .json
                .and_then(|indent| usize::try_from(indent).ok()),
            ..RenderConfig::default()
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let filter = cli.filter();
    let config = cli.scan_config(filter)?;
    let render = cli.render_config();

    let tree = Discoverer::new()
        .discover(&config)
        .wrap_err_with(|| format!("Failed to scan {}", config.root.display()))?;

    tracing::debug!(
        elapsed_ms = tree.scan_duration.as_millis() as u64,
        warnings = tree.warnings.len(),
        "Scan complete"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_output(&tree, &render, cli.json.is_some(), &mut out)
        .and_then(|()| out.flush())
        .context("Failed to write output")?;

    for warning in &tree.warnings {
        eprintln!("warning: {}: {}", warning.path.display(), warning.message);
    }

    Ok(())
}

fn write_output<W: Write>(
    tree: &FileTree,
    render: &RenderConfig,
    json: bool,
    out: &mut W,
) -> io::Result<()> {
    let filter = &tree.config.filter;
    if json {
        let doc = render_structured(&tree.root, &tree.stats, filter, render);
        write_structured(&doc, render.indent, out)
    } else {
        render_pretty(&tree.root, &tree.stats, filter, render, out)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// `some/dir/` becomes `some/dir`; a bare `/` is kept.
fn strip_trailing_separator(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() {
        path.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}
