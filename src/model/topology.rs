//! Explicit atom-to-atom connectivity carried over from source connectivity records.
//!
//! Bonds reference atoms by their zero-based index in [`MolecularStructure::atoms`]. They are
//! only ever materialized from records present in the file; no geometric inference happens
//! here.
//!
//! [`MolecularStructure::atoms`]: super::structure::MolecularStructure::atoms

use super::types::BondOrder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Undirected bond connecting two atoms within a structure.
///
/// Bonds store canonical atom indices (ascending order) so equality, hashing, and sorting
/// remain stable regardless of which partner listed the connection first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bond {
    /// Index of the first atom (always the lesser index after canonicalization).
    pub atom1: usize,
    /// Index of the second atom.
    pub atom2: usize,
    /// Chemical multiplicity assigned to the bond.
    pub order: BondOrder,
}

impl Bond {
    /// Creates a new bond while canonicalizing the endpoint ordering.
    ///
    /// # Arguments
    ///
    /// * `idx1` - Index of one bonded atom.
    /// * `idx2` - Index of the partner atom.
    /// * `order` - Bond multiplicity.
    ///
    /// # Returns
    ///
    /// A `Bond` whose indices are sorted so `atom1 <= atom2`.
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self {
                atom1: idx1,
                atom2: idx2,
                order,
            }
        } else {
            Self {
                atom1: idx2,
                atom2: idx1,
                order,
            }
        }
    }

    /// Checks the bond against an atom list of length `atom_count`.
    ///
    /// A bond is valid when both endpoints exist and differ.
    pub fn is_valid_for(&self, atom_count: usize) -> bool {
        self.atom1 != self.atom2 && self.atom2 < atom_count
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bond {{ {} - {}, order: {} }}",
            self.atom1, self.atom2, self.order
        )
    }
}
