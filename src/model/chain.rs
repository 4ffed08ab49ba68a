use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Chain id assigned to atoms whose source record left the chain column blank.
pub const UNNAMED_CHAIN_ID: &str = "?";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: SmolStr,
    pub atom_indices: Vec<usize>,
    pub residue_indices: Vec<usize>,
}

impl Chain {
    pub fn new(id: &str) -> Self {
        Self {
            id: SmolStr::new(id),
            atom_indices: Vec::new(),
            residue_indices: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, atom_index: usize) {
        self.atom_indices.push(atom_index);
    }

    pub fn add_residue(&mut self, residue_index: usize) {
        debug_assert!(
            !self.residue_indices.contains(&residue_index),
            "Attempted to add residue index '{}' twice to chain '{}'",
            residue_index,
            self.id
        );
        self.residue_indices.push(residue_index);
    }

    pub fn atom_count(&self) -> usize {
        self.atom_indices.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residue_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_indices.is_empty()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {{ id: \"{}\", residues: {}, atoms: {} }}",
            self.id,
            self.residue_count(),
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_new_creates_empty_chain() {
        let chain = Chain::new("A");

        assert_eq!(chain.id, "A");
        assert!(chain.is_empty());
        assert_eq!(chain.residue_count(), 0);
    }

    #[test]
    fn chain_tracks_atoms_and_residues_separately() {
        let mut chain = Chain::new("B");
        chain.add_atom(0);
        chain.add_atom(1);
        chain.add_residue(0);

        assert_eq!(chain.atom_count(), 2);
        assert_eq!(chain.residue_count(), 1);
        assert_eq!(
            chain.to_string(),
            "Chain { id: \"B\", residues: 1, atoms: 2 }"
        );
    }
}
