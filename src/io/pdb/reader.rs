//! Legacy PDB reader built on fixed-column field extraction.
//!
//! The reader walks the text line by line, dispatching on the record name in columns 1-6.
//! Atom records become [`AtomRecord`]s in line order; header-style records (`HEADER`, `TITLE`,
//! `EXPDTA`, `AUTHOR`, `SOURCE`, `REMARK 2`) feed the captured metadata; `HELIX`/`SHEET` and
//! `CONECT` supply secondary structure and explicit connectivity. Unknown record types are
//! ignored and malformed atom lines are skipped and counted rather than failing the parse.

use crate::io::columns::Columns;
use crate::io::detect::Format;
use crate::io::record::{
    AtomRecord, AtomRef, Connection, ParsedSource, SecondaryRange, TextAccumulator,
    infer_element_from_name, push_unique,
};
use crate::model::types::{Point, SecondaryStructure, UNKNOWN_ELEMENT, normalize_element};
use smol_str::SmolStr;

const RECORD_NAME: Columns = Columns::new(1, 6);

const ATOM_SERIAL: Columns = Columns::new(7, 11);
const ATOM_NAME: Columns = Columns::new(13, 16);
const RES_NAME: Columns = Columns::new(18, 20);
const CHAIN_ID: Columns = Columns::new(22, 22);
const RES_SEQ: Columns = Columns::new(23, 26);
const COORD_X: Columns = Columns::new(31, 38);
const COORD_Y: Columns = Columns::new(39, 46);
const COORD_Z: Columns = Columns::new(47, 54);
const OCCUPANCY: Columns = Columns::new(55, 60);
const TEMP_FACTOR: Columns = Columns::new(61, 66);
const ELEMENT: Columns = Columns::new(77, 78);

const HEADER_CLASSIFICATION: Columns = Columns::new(11, 50);
const HEADER_DEP_DATE: Columns = Columns::new(51, 59);
const HEADER_ID_CODE: Columns = Columns::new(63, 66);
const CONTINUED_TEXT: Columns = Columns::new(11, 80);

const HELIX_INIT_CHAIN: Columns = Columns::new(20, 20);
const HELIX_INIT_SEQ: Columns = Columns::new(22, 25);
const HELIX_END_CHAIN: Columns = Columns::new(32, 32);
const HELIX_END_SEQ: Columns = Columns::new(34, 37);

const SHEET_INIT_CHAIN: Columns = Columns::new(22, 22);
const SHEET_INIT_SEQ: Columns = Columns::new(23, 26);
const SHEET_END_CHAIN: Columns = Columns::new(33, 33);
const SHEET_END_SEQ: Columns = Columns::new(34, 37);

const CONECT_SERIAL: Columns = Columns::new(7, 11);
const CONECT_PARTNERS: [Columns; 4] = [
    Columns::new(12, 16),
    Columns::new(17, 21),
    Columns::new(22, 26),
    Columns::new(27, 31),
];

const ORGANISM_TAG: &str = "ORGANISM_SCIENTIFIC:";

/// Multi-record text fields collected while scanning, finalized once at end of input.
#[derive(Default)]
struct HeaderAccumulators {
    title: TextAccumulator,
    method: TextAccumulator,
    authors: TextAccumulator,
    source: TextAccumulator,
}

/// Parses legacy PDB text into reader-neutral records.
///
/// Atom records keep file line order, which later becomes the stable atom index space.
/// Non-numeric or non-finite coordinates drop just that atom record and bump
/// `skipped.atoms`.
///
/// # Arguments
///
/// * `text` - Full file contents already classified as legacy PDB.
///
/// # Returns
///
/// A [`ParsedSource`] with atoms, captured metadata, secondary-structure ranges, and
/// `CONECT` connections.
pub(crate) fn read(text: &str) -> ParsedSource {
    let mut source = ParsedSource::new(Format::Legacy);
    let mut text_fields = HeaderAccumulators::default();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let Some(record) = RECORD_NAME.text(line) else {
            continue;
        };

        match record {
            "ATOM" | "HETATM" => match parse_atom_record(line, record == "HETATM") {
                Some(atom) => source.atoms.push(atom),
                None => {
                    source.skipped.atoms += 1;
                    log::warn!(
                        "PDB line {line_num}: skipping {record} record with malformed coordinates"
                    );
                }
            },
            "HEADER" => parse_header(line, &mut source),
            "TITLE" => text_fields.title.push(CONTINUED_TEXT.text(line).unwrap_or("")),
            "EXPDTA" => text_fields.method.push(CONTINUED_TEXT.text(line).unwrap_or("")),
            "AUTHOR" => text_fields.authors.push(CONTINUED_TEXT.text(line).unwrap_or("")),
            "SOURCE" => text_fields.source.push(CONTINUED_TEXT.text(line).unwrap_or("")),
            "REMARK" => {
                if source.metadata.resolution.is_none() {
                    source.metadata.resolution = parse_resolution_remark(line);
                }
            }
            "HELIX" => {
                if let Some(range) = parse_helix(line) {
                    source.secondary.push(range);
                }
            }
            "SHEET" => {
                if let Some(range) = parse_sheet(line) {
                    source.secondary.push(range);
                }
            }
            "CONECT" => parse_conect(line, line_num, &mut source),
            _ => {}
        }
    }

    finalize_header(text_fields, &mut source);

    log::debug!(
        "PDB reader collected {} atoms, {} secondary ranges, {} connections ({} atom records skipped)",
        source.atoms.len(),
        source.secondary.len(),
        source.connections.len(),
        source.skipped.atoms
    );

    source
}

/// Parses one `ATOM`/`HETATM` line.
///
/// Coordinates are mandatory and must be finite; every other field degrades to `None` when
/// blank or unparsable.
///
/// # Returns
///
/// `Some(AtomRecord)` on success, `None` when any coordinate column is missing or malformed.
fn parse_atom_record(line: &str, is_hetatm: bool) -> Option<AtomRecord> {
    let x = parse_coordinate(line, COORD_X)?;
    let y = parse_coordinate(line, COORD_Y)?;
    let z = parse_coordinate(line, COORD_Z)?;

    let name_field = ATOM_NAME.raw(line).unwrap_or("");
    let element = ELEMENT
        .text(line)
        .and_then(normalize_element)
        .or_else(|| infer_element_from_name(name_field))
        .unwrap_or(UNKNOWN_ELEMENT);

    Some(AtomRecord {
        serial: ATOM_SERIAL.parse(line),
        name: ATOM_NAME.text(line).map(SmolStr::new),
        residue_name: RES_NAME.text(line).map(SmolStr::new),
        chain_id: CHAIN_ID.text(line).map(SmolStr::new),
        residue_seq: RES_SEQ.parse(line),
        pos: Point::new(x, y, z),
        occupancy: OCCUPANCY.parse(line),
        b_factor: TEMP_FACTOR.parse(line),
        element: SmolStr::new(element),
        is_hetatm,
    })
}

fn parse_coordinate(line: &str, columns: Columns) -> Option<f64> {
    columns.parse::<f64>(line).filter(|v| v.is_finite())
}

fn parse_header(line: &str, source: &mut ParsedSource) {
    let metadata = &mut source.metadata;
    metadata.classification = HEADER_CLASSIFICATION.text(line).map(str::to_string);
    metadata.deposition_date = HEADER_DEP_DATE.text(line).map(str::to_string);
    metadata.id = HEADER_ID_CODE.text(line).map(str::to_string);
}

/// Extracts the resolution from `REMARK   2 RESOLUTION.    1.74 ANGSTROMS.`.
///
/// Any other remark, or `RESOLUTION. NOT APPLICABLE.`, yields `None`.
fn parse_resolution_remark(line: &str) -> Option<f64> {
    let body = line.get(6..)?.trim_start();
    let rest = body.strip_prefix('2')?.trim_start();
    let value = rest.strip_prefix("RESOLUTION.")?;
    value
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_helix(line: &str) -> Option<SecondaryRange> {
    parse_range(
        line,
        SecondaryStructure::Helix,
        (HELIX_INIT_CHAIN, HELIX_INIT_SEQ),
        (HELIX_END_CHAIN, HELIX_END_SEQ),
    )
}

fn parse_sheet(line: &str) -> Option<SecondaryRange> {
    parse_range(
        line,
        SecondaryStructure::Sheet,
        (SHEET_INIT_CHAIN, SHEET_INIT_SEQ),
        (SHEET_END_CHAIN, SHEET_END_SEQ),
    )
}

/// Builds a range from the init/end chain and sequence columns of `HELIX`/`SHEET` records.
///
/// Ranges spanning two chains are not meaningful for residue assignment and are dropped.
fn parse_range(
    line: &str,
    kind: SecondaryStructure,
    init: (Columns, Columns),
    end: (Columns, Columns),
) -> Option<SecondaryRange> {
    let chain_id = init.0.text(line)?;
    if end.0.text(line).is_some_and(|end_chain| end_chain != chain_id) {
        return None;
    }
    let start_seq = init.1.parse::<i32>(line)?;
    let end_seq = end.1.parse::<i32>(line)?;

    Some(SecondaryRange {
        kind,
        chain_id: SmolStr::new(chain_id),
        start_seq: start_seq.min(end_seq),
        end_seq: start_seq.max(end_seq),
    })
}

/// Parses a `CONECT` record into connections keyed by serial number.
///
/// A partner listed more than once in the same record raises the bond order (capped at
/// triple), following the legacy convention for multiple bonds.
fn parse_conect(line: &str, line_num: usize, source: &mut ParsedSource) {
    let Some(serial) = CONECT_SERIAL.parse::<i32>(line) else {
        source.skipped.bonds += 1;
        log::warn!("PDB line {line_num}: CONECT record without a valid atom serial");
        return;
    };

    let mut partners: Vec<(i32, u8)> = Vec::new();
    for columns in CONECT_PARTNERS {
        let Some(partner) = columns.parse::<i32>(line) else {
            continue;
        };
        match partners.iter_mut().find(|(p, _)| *p == partner) {
            Some((_, order)) => *order = (*order + 1).min(3),
            None => partners.push((partner, 1)),
        }
    }

    for (partner, order) in partners {
        source.connections.push(Connection {
            from: AtomRef::Serial(serial),
            to: AtomRef::Serial(partner),
            order,
        });
    }
}

fn finalize_header(fields: HeaderAccumulators, source: &mut ParsedSource) {
    let metadata = &mut source.metadata;
    metadata.title = fields.title.finish();
    metadata.method = fields.method.finish();

    if let Some(authors) = fields.authors.finish() {
        for author in authors.split(',') {
            push_unique(&mut metadata.authors, author);
        }
    }

    if let Some(source_text) = fields.source.finish() {
        for entry in source_text.split(';') {
            if let Some(organism) = entry.trim().strip_prefix(ORGANISM_TAG) {
                push_unique(&mut metadata.organisms, organism);
            }
        }
    }
}
