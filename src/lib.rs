//! # molload
//!
//! **molload** turns uploaded or fetched macromolecular structure files into a normalized, serializable model. It accepts both the legacy fixed-column PDB format and the tag/loop based mmCIF format, validates untrusted text before parsing it, and produces a flat structure whose atoms, residues, chains, and bonds reference each other by stable indices.
//!
//! ## Features
//!
//! - **Format detection** – Line-prefix indicators decide between PDB and mmCIF; ambiguous or unrecognized text is rejected instead of guessed.
//! - **Tolerant readers** – Fixed-width field extraction and a quote-aware mmCIF tokenizer skip and count malformed records while the rest of the file still loads.
//! - **Normalized model** – `Atom`, `Residue`, `Chain`, `Bond`, and `StructureMetadata` types backed by `nalgebra` and `serde`, with derived counts that always match the lists.
//! - **Input validation** – Size limits, content-safety scanning, extension/marker agreement, and empty-structure rejection map onto a single `thiserror` error type with HTTP status hints.
//! - **Batch loading and caching** – Independent files load in parallel through Rayon, and a content-hash keyed cache interface sits outside the parser.

mod model;
mod utils;

pub mod io;

pub use model::atom::Atom;
pub use model::chain::{Chain, UNNAMED_CHAIN_ID};
pub use model::metadata::{
    CLASSIFICATION_KEY, COMPUTATIONAL_MODEL_KEY, SOURCE_KEY, StructureMetadata,
};
pub use model::residue::Residue;
pub use model::structure::MolecularStructure;
pub use model::topology::Bond;
pub use model::types::{BondOrder, Point, SecondaryStructure, UNKNOWN_ELEMENT, normalize_element};
