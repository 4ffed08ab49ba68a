//! Reader-neutral intermediate records handed from the format readers to the builder.
//!
//! Both the PDB and mmCIF readers reduce their input to a [`ParsedSource`]: atom records in
//! file order, captured metadata strings, secondary-structure ranges, and explicit
//! connectivity. The builder never needs to know which reader produced it.

use super::detect::Format;
use crate::model::types::{Point, SecondaryStructure, normalize_element};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Counts of individual records dropped during a parse.
///
/// These are recoverable problems; the parse still succeeds if at least one atom remains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecords {
    /// Atom records with missing or non-numeric coordinates.
    pub atoms: usize,
    /// Table rows dropped for tokenization or column-count problems.
    pub rows: usize,
    /// Connectivity entries with unresolved endpoints, self-bonds, or invalid orders.
    pub bonds: usize,
}

impl SkippedRecords {
    pub fn total(&self) -> usize {
        self.atoms + self.rows + self.bonds
    }
}

/// One atom as read from an `ATOM`/`HETATM` line or an `_atom_site` row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AtomRecord {
    pub serial: Option<i32>,
    pub name: Option<SmolStr>,
    pub residue_name: Option<SmolStr>,
    pub chain_id: Option<SmolStr>,
    pub residue_seq: Option<i32>,
    pub pos: Point,
    pub occupancy: Option<f64>,
    pub b_factor: Option<f64>,
    pub element: SmolStr,
    pub is_hetatm: bool,
}

/// Inclusive residue range carrying a secondary-structure assignment.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SecondaryRange {
    pub kind: SecondaryStructure,
    pub chain_id: SmolStr,
    pub start_seq: i32,
    pub end_seq: i32,
}

impl SecondaryRange {
    pub fn contains(&self, chain_id: &str, seq: i32) -> bool {
        self.chain_id == chain_id && (self.start_seq..=self.end_seq).contains(&seq)
    }
}

/// How a connectivity record names one of its atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum AtomRef {
    /// PDB `CONECT` style reference by atom serial number.
    Serial(i32),
    /// mmCIF `_struct_conn` style reference by chain, residue number, and atom name.
    Site {
        chain_id: SmolStr,
        residue_seq: i32,
        atom_name: SmolStr,
    },
}

/// Explicit bond listed by the source file, prior to index resolution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Connection {
    pub from: AtomRef,
    pub to: AtomRef,
    /// Raw bond-order code; anything outside 1..=4 is rejected by the builder.
    pub order: u8,
}

/// Metadata strings captured from header records or metadata categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SourceMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub resolution: Option<f64>,
    pub method: Option<String>,
    pub deposition_date: Option<String>,
    pub authors: Vec<String>,
    pub organisms: Vec<String>,
    pub classification: Option<String>,
}

/// Everything a reader extracted from one input, in file order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedSource {
    pub format: Format,
    pub atoms: Vec<AtomRecord>,
    pub metadata: SourceMetadata,
    pub secondary: Vec<SecondaryRange>,
    pub connections: Vec<Connection>,
    pub skipped: SkippedRecords,
}

impl ParsedSource {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            atoms: Vec::new(),
            metadata: SourceMetadata::default(),
            secondary: Vec::new(),
            connections: Vec::new(),
            skipped: SkippedRecords::default(),
        }
    }
}

/// Accumulates text that may continue across several records (e.g. `TITLE`, `EXPDTA`).
///
/// Fragments are trimmed and joined with single spaces in encounter order; the result is
/// produced once by [`TextAccumulator::finish`].
#[derive(Debug, Clone, Default)]
pub(crate) struct TextAccumulator {
    buffer: String,
}

impl TextAccumulator {
    pub fn push(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(fragment);
    }

    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }
}

/// Pushes `value` unless an equal entry is already present.
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Infers an element symbol from a four-character atom-name field when columns 77-78 are
/// blank.
///
/// PDB convention left-justifies two-letter elements (`FE  `) and right-justifies
/// single-letter ones (` CA `), so a letter pair is only tried when it starts in the first
/// column. Falls back to the first letter, then to any later pair or letter.
pub(crate) fn infer_element_from_name(field: &str) -> Option<&'static str> {
    let letters: Vec<(usize, char)> = field
        .char_indices()
        .filter(|(_, ch)| ch.is_ascii_alphabetic())
        .collect();

    let pair = |first: (usize, char), second: (usize, char)| -> Option<&'static str> {
        let contiguous = second.0 == first.0 + first.1.len_utf8();
        if !contiguous {
            return None;
        }
        let mut symbol = String::with_capacity(2);
        symbol.push(first.1);
        symbol.push(second.1);
        normalize_element(&symbol)
    };
    let single = |ch: char| normalize_element(ch.encode_utf8(&mut [0; 4]));

    let (&first, rest) = letters.split_first()?;

    if first.0 == 0 {
        if let Some(el) = rest.first().and_then(|&second| pair(first, second)) {
            return Some(el);
        }
    }

    if let Some(el) = single(first.1) {
        return Some(el);
    }

    for window in letters.windows(2) {
        if let Some(el) = pair(window[0], window[1]).or_else(|| single(window[1].1)) {
            return Some(el);
        }
    }

    None
}
