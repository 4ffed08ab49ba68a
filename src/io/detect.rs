//! Format detection over raw structure text.
//!
//! The detector looks only at line prefixes. A `data_` line marks mmCIF content; `ATOM`,
//! `HETATM`, `HEADER`, or `TITLE` lines mark legacy PDB content. mmCIF `_atom_site` rows also
//! begin with `ATOM`/`HETATM`, so those prefixes only count as PDB indicators before the first
//! `data_` block.

use std::fmt;
use std::path::Path;

const TAG_INDICATOR: &str = "data_";
const LEGACY_ATOM_INDICATORS: [&str; 2] = ["ATOM", "HETATM"];
const LEGACY_HEADER_INDICATORS: [&str; 2] = ["HEADER", "TITLE"];

/// Structure text formats recognized by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Fixed-column PDB records.
    Legacy,
    /// Tag/loop based mmCIF data blocks.
    Tag,
    /// Neither (or both) sets of indicators were found.
    Unknown,
}

impl Format {
    /// Display name used in diagnostics (`"PDB"`, `"mmCIF"`).
    pub fn name(&self) -> &'static str {
        match self {
            Format::Legacy => "PDB",
            Format::Tag => "mmCIF",
            Format::Unknown => "unknown",
        }
    }

    /// Maps a filename extension to the format it promises.
    ///
    /// Returns `None` for missing or unrecognized extensions, in which case no format-marker
    /// check applies.
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdb" | "ent" => Some(Self::Legacy),
            "cif" | "mmcif" => Some(Self::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which indicator families were found while scanning a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Indicators {
    pub legacy: bool,
    pub tag: bool,
}

/// Scans every line once and records which format indicators are present.
pub(crate) fn scan_indicators(text: &str) -> Indicators {
    let mut indicators = Indicators::default();

    for line in text.lines() {
        if line.starts_with(TAG_INDICATOR) {
            indicators.tag = true;
        } else if LEGACY_HEADER_INDICATORS.iter().any(|p| line.starts_with(p)) {
            indicators.legacy = true;
        } else if !indicators.tag && LEGACY_ATOM_INDICATORS.iter().any(|p| line.starts_with(p)) {
            indicators.legacy = true;
        }

        if indicators.legacy && indicators.tag {
            break;
        }
    }

    indicators
}

/// Decides which reader should handle `text`.
///
/// # Returns
///
/// [`Format::Tag`] or [`Format::Legacy`] when exactly one indicator family is present,
/// otherwise [`Format::Unknown`].
///
/// # Examples
///
/// ```
/// use molload::io::{Format, detect_format};
///
/// assert_eq!(detect_format("data_1ABC\n_entry.id 1ABC\n"), Format::Tag);
/// assert_eq!(detect_format("HEADER    TEST\n"), Format::Legacy);
/// assert_eq!(detect_format("hello\n"), Format::Unknown);
/// ```
pub fn detect_format(text: &str) -> Format {
    match scan_indicators(text) {
        Indicators {
            legacy: true,
            tag: false,
        } => Format::Legacy,
        Indicators {
            legacy: false,
            tag: true,
        } => Format::Tag,
        _ => Format::Unknown,
    }
}
