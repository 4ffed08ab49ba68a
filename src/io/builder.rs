//! Assembly of the normalized [`MolecularStructure`] from reader output.
//!
//! The builder is format-agnostic: it consumes a [`ParsedSource`] and assigns atom indices in
//! record order, groups atoms into residues and chains, applies secondary-structure ranges,
//! resolves explicit connectivity to index-based bonds, and derives the metadata counts from
//! the final lists.

use crate::io::record::{
    AtomRecord, AtomRef, Connection, ParsedSource, SecondaryRange, SkippedRecords, SourceMetadata,
};
use crate::model::{
    atom::Atom,
    chain::{Chain, UNNAMED_CHAIN_ID},
    metadata::{CLASSIFICATION_KEY, StructureMetadata},
    residue::Residue,
    structure::MolecularStructure,
    topology::Bond,
    types::{BondOrder, SecondaryStructure},
};
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};

/// Residue name used when a record carries a residue number but no name.
const UNKNOWN_RESIDUE_NAME: &str = "UNK";

/// Builds a structure and returns it with the final skip counts.
///
/// Connections that cannot be resolved, point an atom at itself, or carry an order outside
/// 1..=4 are discarded and added to `skipped.bonds`.
pub(crate) fn build(source: ParsedSource) -> (MolecularStructure, SkippedRecords) {
    let ParsedSource {
        format,
        atoms: records,
        metadata,
        secondary,
        connections,
        mut skipped,
    } = source;

    let mut structure = MolecularStructure::new();
    group_atoms(records, &mut structure);
    assign_secondary_structure(&secondary, &mut structure.residues);

    if !connections.is_empty() {
        let bonds = resolve_connections(&connections, &structure.atoms, &mut skipped);
        structure.bonds = Some(bonds);
    }

    structure.metadata = assemble_metadata(metadata, &structure);

    debug_assert_eq!(structure.validate_invariants(), Ok(()));
    log::debug!(
        "built {format} structure: {} atoms, {} residues, {} chains, {} bonds",
        structure.atom_count(),
        structure.residue_count(),
        structure.chain_count(),
        structure.bond_count()
    );

    (structure, skipped)
}

/// Appends atoms in record order and files them into chains and residues.
///
/// Chains appear in first-seen order, with chainless atoms collected under
/// [`UNNAMED_CHAIN_ID`]. A residue is keyed by (chain, residue number); a key seen again later
/// in the file extends the existing residue so residue ids stay unique within a chain.
fn group_atoms(records: Vec<AtomRecord>, structure: &mut MolecularStructure) {
    let mut chain_slots: HashMap<SmolStr, usize> = HashMap::new();
    let mut residue_slots: HashMap<(usize, i32), usize> = HashMap::new();

    structure.atoms.reserve(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let chain_key = record
            .chain_id
            .clone()
            .unwrap_or_else(|| SmolStr::new(UNNAMED_CHAIN_ID));
        let chain_idx = *chain_slots.entry(chain_key).or_insert_with_key(|key| {
            structure.chains.push(Chain::new(key));
            structure.chains.len() - 1
        });
        structure.chains[chain_idx].add_atom(index);

        if let Some(seq) = record.residue_seq {
            let residue_idx = *residue_slots.entry((chain_idx, seq)).or_insert_with(|| {
                let name = record
                    .residue_name
                    .as_deref()
                    .unwrap_or(UNKNOWN_RESIDUE_NAME);
                let chain = &mut structure.chains[chain_idx];
                structure.residues.push(Residue::new(seq, name, &chain.id));
                let residue_idx = structure.residues.len() - 1;
                chain.add_residue(residue_idx);
                residue_idx
            });
            structure.residues[residue_idx].add_atom(index);
        }

        structure.atoms.push(into_atom(record));
    }
}

fn into_atom(record: AtomRecord) -> Atom {
    let is_backbone = record
        .name
        .as_deref()
        .map(|name| !record.is_hetatm && Atom::is_backbone_name(name));

    Atom {
        serial: record.serial,
        element: record.element,
        pos: record.pos,
        residue_name: record.residue_name,
        residue_seq: record.residue_seq,
        chain_id: record.chain_id,
        name: record.name,
        b_factor: record.b_factor,
        occupancy: record.occupancy,
        is_ligand: Some(record.is_hetatm),
        is_backbone,
    }
}

/// Marks residues covered by a range with its kind; the rest become coil.
///
/// Sources without any ranges leave every assignment unset.
fn assign_secondary_structure(ranges: &[SecondaryRange], residues: &mut [Residue]) {
    if ranges.is_empty() {
        return;
    }
    for residue in residues {
        let kind = ranges
            .iter()
            .find(|range| range.contains(&residue.chain_id, residue.id))
            .map_or(SecondaryStructure::Coil, |range| range.kind);
        residue.secondary_structure = Some(kind);
    }
}

/// Lookup tables from the two ways a connection can name an atom to the atom index.
///
/// On duplicate keys (e.g. repeated serials across models) the first atom wins.
struct AtomLookup {
    by_serial: HashMap<i32, usize>,
    by_site: HashMap<(SmolStr, i32, SmolStr), usize>,
}

impl AtomLookup {
    fn new(atoms: &[Atom]) -> Self {
        let mut by_serial = HashMap::new();
        let mut by_site = HashMap::new();
        for (index, atom) in atoms.iter().enumerate() {
            if let Some(serial) = atom.serial {
                by_serial.entry(serial).or_insert(index);
            }
            if let (Some(chain), Some(seq), Some(name)) =
                (&atom.chain_id, atom.residue_seq, &atom.name)
            {
                by_site
                    .entry((chain.clone(), seq, name.clone()))
                    .or_insert(index);
            }
        }
        Self { by_serial, by_site }
    }

    fn resolve(&self, reference: &AtomRef) -> Option<usize> {
        match reference {
            AtomRef::Serial(serial) => self.by_serial.get(serial).copied(),
            AtomRef::Site {
                chain_id,
                residue_seq,
                atom_name,
            } => self
                .by_site
                .get(&(chain_id.clone(), *residue_seq, atom_name.clone()))
                .copied(),
        }
    }
}

/// Turns source connections into deduplicated, validated bonds in first-seen order.
fn resolve_connections(
    connections: &[Connection],
    atoms: &[Atom],
    skipped: &mut SkippedRecords,
) -> Vec<Bond> {
    let lookup = AtomLookup::new(atoms);
    let mut seen = HashSet::new();
    let mut bonds = Vec::new();

    for connection in connections {
        let endpoints = lookup
            .resolve(&connection.from)
            .zip(lookup.resolve(&connection.to));
        let Some((from, to)) = endpoints else {
            skipped.bonds += 1;
            log::warn!("discarding bond with an unresolved endpoint: {connection:?}");
            continue;
        };
        if from == to {
            skipped.bonds += 1;
            log::warn!("discarding self-bond on atom {from}");
            continue;
        }
        let Some(order) = BondOrder::from_code(connection.order) else {
            skipped.bonds += 1;
            log::warn!(
                "discarding bond {from}-{to} with invalid order code {}",
                connection.order
            );
            continue;
        };

        let bond = Bond::new(from, to, order);
        if seen.insert((bond.atom1, bond.atom2)) {
            bonds.push(bond);
        }
    }

    bonds
}

fn assemble_metadata(source: SourceMetadata, structure: &MolecularStructure) -> StructureMetadata {
    let mut metadata = StructureMetadata {
        id: source.id,
        title: source.title,
        resolution: source.resolution,
        method: source.method,
        deposition_date: source.deposition_date,
        authors: source.authors,
        organisms: source.organisms,
        chain_ids: structure.chains.iter().map(|c| c.id.to_string()).collect(),
        atom_count: structure.atoms.len(),
        residue_count: structure.residues.len(),
        ..StructureMetadata::default()
    };
    if let Some(classification) = source.classification {
        metadata.set_extension(CLASSIFICATION_KEY, classification);
    }
    metadata
}
