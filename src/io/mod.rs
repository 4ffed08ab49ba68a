//! IO front-end turning raw PDB or mmCIF text into a [`MolecularStructure`].
//!
//! [`load_structure`] is the single parse entrypoint used by upload and fetch routes. It runs
//! the pre-parse validators, detects the format, dispatches to the matching reader, builds the
//! normalized model, and rejects structures without atoms. Recoverable per-record problems are
//! reported through [`SkippedRecords`] rather than failing the call.

mod builder;
mod cache;
mod columns;
mod config;
mod detect;
mod error;
mod mmcif;
mod pdb;
mod record;
mod validate;

use crate::model::structure::MolecularStructure;
use crate::utils::parallel::*;

pub use cache::{CacheKey, MemoryCache, StructureCache, load_cached};
pub use config::{DEFAULT_MAX_INPUT_BYTES, LoadConfig};
pub use detect::{Format, detect_format};
pub use error::Error;
pub use record::SkippedRecords;
pub use validate::{
    MAX_FILENAME_LEN, check_content_safety, check_format_markers, check_size, sanitize_filename,
};

/// A successfully parsed structure together with what the parse had to drop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedStructure {
    pub structure: MolecularStructure,
    /// Format the text was detected as.
    pub format: Format,
    pub skipped: SkippedRecords,
}

/// Validates and parses structure text.
///
/// Checks run in a fixed order and the first failure ends the call: size limit, content
/// safety, filename format markers (only when `filename` has a `.pdb`/`.ent`/`.cif`/`.mmcif`
/// extension), format detection, parsing, and finally the non-empty check.
///
/// # Arguments
///
/// * `text` - Complete file contents.
/// * `filename` - Client-supplied (already sanitized) filename, if any.
/// * `config` - Limits to enforce.
///
/// # Returns
///
/// The built structure with stable zero-based atom indices in file order, plus skip counts.
///
/// # Errors
///
/// Returns [`Error::SizeLimitExceeded`], [`Error::ContentSafetyViolation`],
/// [`Error::FormatMismatch`], [`Error::UnknownFormat`], [`Error::EmptyStructure`], or
/// [`Error::Parse`]. No partially built structure is ever returned.
///
/// # Examples
///
/// ```
/// use molload::io::{LoadConfig, load_structure};
///
/// let text = "HEADER    TEST\n\
///             ATOM      1  CA  ALA A   1      11.104  13.207   2.123  1.00 20.00           C\n";
/// let loaded = load_structure(text, Some("test.pdb"), &LoadConfig::default()).unwrap();
///
/// assert_eq!(loaded.structure.atom_count(), 1);
/// assert_eq!(loaded.structure.atoms[0].element, "C");
/// assert_eq!(loaded.structure.chains[0].id, "A");
/// assert_eq!(loaded.structure.residues[0].id, 1);
/// ```
pub fn load_structure(
    text: &str,
    filename: Option<&str>,
    config: &LoadConfig,
) -> Result<LoadedStructure, Error> {
    check_size(text, config.max_input_bytes)?;
    check_content_safety(text)?;
    if let Some(filename) = filename {
        check_format_markers(text, filename)?;
    }

    let format = detect_format(text);
    log::debug!(
        "detected {format} input ({} bytes, filename {filename:?})",
        text.len()
    );

    let source = match format {
        Format::Legacy => pdb::reader::read(text),
        Format::Tag => mmcif::reader::read(text)?,
        Format::Unknown => return Err(Error::UnknownFormat),
    };

    let (structure, skipped) = builder::build(source);
    if structure.is_empty() {
        return Err(Error::EmptyStructure {
            format: format.name(),
        });
    }
    if skipped.total() > 0 {
        log::warn!(
            "{format} parse skipped {} atom records, {} rows, {} bonds",
            skipped.atoms,
            skipped.rows,
            skipped.bonds
        );
    }

    Ok(LoadedStructure {
        structure,
        format,
        skipped,
    })
}

/// Parses structure text with the default [`LoadConfig`], returning only the structure.
///
/// # Errors
///
/// Same as [`load_structure`].
pub fn parse_structure(text: &str, filename: Option<&str>) -> Result<MolecularStructure, Error> {
    load_structure(text, filename, &LoadConfig::default()).map(|loaded| loaded.structure)
}

/// Loads several independent inputs, in parallel when the `parallel` feature is enabled.
///
/// Results are returned in input order; one failing input does not affect the others.
///
/// # Arguments
///
/// * `inputs` - Pairs of file text and optional filename.
/// * `config` - Limits applied to every input.
pub fn load_batch(
    inputs: &[(&str, Option<&str>)],
    config: &LoadConfig,
) -> Vec<Result<LoadedStructure, Error>> {
    inputs
        .par_iter()
        .map(|(text, filename)| load_structure(text, *filename, config))
        .collect()
}
