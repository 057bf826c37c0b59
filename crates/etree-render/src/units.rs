//! Byte count formatting.

use humansize::{BINARY, FormatSizeOptions};
use strum::Display;

const KIB: u64 = 1024;

/// How absolute sizes are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SizeUnits {
    /// IEC units with two decimals, e.g. `16.00 KiB`.
    #[default]
    Human,
    /// Raw byte count, e.g. `16384 B`.
    Bytes,
}

impl SizeUnits {
    pub fn format(&self, bytes: u64) -> String {
        match self {
            SizeUnits::Human => format_size(bytes),
            SizeUnits::Bytes => format!("{bytes} B"),
        }
    }
}

/// Format size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{bytes} B");
    }
    let options = FormatSizeOptions::from(BINARY)
        .decimal_places(2)
        .decimal_zeroes(2);
    humansize::format_size(bytes, options)
}
