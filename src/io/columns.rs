//! Bounds-checked fixed-width field extraction for column-oriented records.
//!
//! Column ranges use the one-based, inclusive convention of the PDB format documentation
//! (`x` lives in columns 31-38). Every accessor returns `Option` so a short or garbled line
//! only loses the affected field, never the whole record.

use std::str::FromStr;

/// Inclusive, one-based column range within a record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Columns {
    pub first: usize,
    pub last: usize,
}

impl Columns {
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Raw slice covered by the range, truncated at the end of the line.
    ///
    /// Returns `None` when the line ends before the first column or the range would split a
    /// multi-byte character.
    pub fn raw<'a>(&self, line: &'a str) -> Option<&'a str> {
        let start = self.first.checked_sub(1)?;
        let end = self.last.min(line.len());
        if start >= end || !line.is_char_boundary(start) || !line.is_char_boundary(end) {
            return None;
        }
        Some(&line[start..end])
    }

    /// Trimmed field content, `None` when absent or blank.
    pub fn text<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.raw(line).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Parses the trimmed field as `T`, `None` when absent, blank, or malformed.
    pub fn parse<T: FromStr>(&self, line: &str) -> Option<T> {
        self.text(line)?.parse().ok()
    }
}
