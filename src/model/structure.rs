use super::atom::Atom;
use super::chain::Chain;
use super::metadata::StructureMetadata;
use super::residue::Residue;
use super::topology::Bond;
use super::types::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Root aggregate produced by one parse call.
///
/// Indices stored in [`Bond`], [`Chain`], and [`Residue`] refer to positions in
/// [`atoms`](Self::atoms) and [`residues`](Self::residues). `bonds` is `None` when the source
/// carried no explicit connectivity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularStructure {
    pub atoms: Vec<Atom>,
    #[serde(default)]
    pub bonds: Option<Vec<Bond>>,
    pub chains: Vec<Chain>,
    pub residues: Vec<Residue>,
    pub metadata: StructureMetadata,
}

impl MolecularStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn residue(&self, chain_id: &str, residue_id: i32) -> Option<&Residue> {
        self.chain(chain_id)?
            .residue_indices
            .iter()
            .map(|&i| &self.residues[i])
            .find(|r| r.id == residue_id)
    }

    pub fn iter_residue_atoms<'a>(
        &'a self,
        residue: &'a Residue,
    ) -> impl Iterator<Item = &'a Atom> {
        residue.atom_indices.iter().map(move |&i| &self.atoms[i])
    }

    pub fn geometric_center(&self) -> Point {
        let mut sum = nalgebra::Vector3::zeros();
        for atom in &self.atoms {
            sum += atom.pos.coords;
        }

        if self.atoms.is_empty() {
            Point::origin()
        } else {
            Point::from(sum / (self.atoms.len() as f64))
        }
    }

    /// Axis-aligned bounding box `(min, max)` of all atom positions.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = self.atoms.first()?.pos;
        let (min, max) = self.atoms.iter().fold((first, first), |(min, max), atom| {
            (min.inf(&atom.pos), max.sup(&atom.pos))
        });
        Some((min, max))
    }

    /// Checks every structural invariant of the model.
    ///
    /// Verifies non-empty elements, finite coordinates, bond endpoints, chain/residue index
    /// bounds, residue-id uniqueness per chain, and that the metadata counts match the lists.
    ///
    /// # Returns
    ///
    /// `Ok(())` when consistent, otherwise a description of the first violation found.
    pub fn validate_invariants(&self) -> Result<(), String> {
        let atom_count = self.atoms.len();
        let residue_count = self.residues.len();

        for (i, atom) in self.atoms.iter().enumerate() {
            if atom.element.is_empty() {
                return Err(format!("atom {i} has an empty element"));
            }
            if !atom.has_finite_position() {
                return Err(format!("atom {i} has a non-finite position"));
            }
        }

        for bond in self.bonds.iter().flatten() {
            if !bond.is_valid_for(atom_count) {
                return Err(format!("invalid bond {bond}"));
            }
        }

        for chain in &self.chains {
            if let Some(i) = chain.atom_indices.iter().find(|&&i| i >= atom_count) {
                return Err(format!("chain '{}' references missing atom {i}", chain.id));
            }
            if let Some(i) = chain.residue_indices.iter().find(|&&i| i >= residue_count) {
                return Err(format!("chain '{}' references missing residue {i}", chain.id));
            }
            let mut seen = HashSet::new();
            for &i in &chain.residue_indices {
                if !seen.insert(self.residues[i].id) {
                    return Err(format!(
                        "residue id {} is duplicated in chain '{}'",
                        self.residues[i].id, chain.id
                    ));
                }
            }
        }

        for residue in &self.residues {
            if let Some(i) = residue.atom_indices.iter().find(|&&i| i >= atom_count) {
                return Err(format!("{residue} references missing atom {i}"));
            }
        }

        if self.metadata.atom_count != atom_count {
            return Err(format!(
                "metadata atom count {} does not match {atom_count} atoms",
                self.metadata.atom_count
            ));
        }
        if self.metadata.residue_count != residue_count {
            return Err(format!(
                "metadata residue count {} does not match {residue_count} residues",
                self.metadata.residue_count
            ));
        }

        Ok(())
    }
}

impl fmt::Display for MolecularStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MolecularStructure {{ chains: {}, residues: {}, atoms: {}, bonds: {} }}",
            self.chain_count(),
            self.residue_count(),
            self.atom_count(),
            self.bond_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::BondOrder;

    fn small_structure() -> MolecularStructure {
        let mut structure = MolecularStructure::new();
        structure.atoms.push(Atom::new("N", Point::new(0.0, 0.0, 0.0)));
        structure.atoms.push(Atom::new("C", Point::new(2.0, 4.0, -2.0)));

        let mut residue = Residue::new(1, "GLY", "A");
        residue.add_atom(0);
        residue.add_atom(1);
        structure.residues.push(residue);

        let mut chain = Chain::new("A");
        chain.add_atom(0);
        chain.add_atom(1);
        chain.add_residue(0);
        structure.chains.push(chain);

        structure.metadata.atom_count = 2;
        structure.metadata.residue_count = 1;
        structure
    }

    #[test]
    fn counts_and_lookups_follow_lists() {
        let structure = small_structure();

        assert_eq!(structure.atom_count(), 2);
        assert_eq!(structure.residue_count(), 1);
        assert_eq!(structure.chain_count(), 1);
        assert_eq!(structure.bond_count(), 0);
        assert!(structure.chain("A").is_some());
        assert!(structure.chain("B").is_none());

        let residue = structure.residue("A", 1).expect("residue exists");
        let names: Vec<_> = structure
            .iter_residue_atoms(residue)
            .map(|a| a.element.as_str())
            .collect();
        assert_eq!(names, vec!["N", "C"]);
    }

    #[test]
    fn geometric_center_and_bounding_box() {
        let structure = small_structure();

        let center = structure.geometric_center();
        assert!((center.x - 1.0).abs() < 1e-10);
        assert!((center.y - 2.0).abs() < 1e-10);
        assert!((center.z + 1.0).abs() < 1e-10);

        let (min, max) = structure.bounding_box().unwrap();
        assert_eq!(min, Point::new(0.0, 0.0, -2.0));
        assert_eq!(max, Point::new(2.0, 4.0, 0.0));

        assert!(MolecularStructure::new().bounding_box().is_none());
        assert_eq!(MolecularStructure::new().geometric_center(), Point::origin());
    }

    #[test]
    fn validate_invariants_accepts_consistent_model() {
        let mut structure = small_structure();
        structure.bonds = Some(vec![Bond::new(0, 1, BondOrder::Single)]);
        assert_eq!(structure.validate_invariants(), Ok(()));
    }

    #[test]
    fn validate_invariants_rejects_dangling_bond() {
        let mut structure = small_structure();
        structure.bonds = Some(vec![Bond::new(0, 5, BondOrder::Single)]);
        assert!(structure.validate_invariants().is_err());
    }

    #[test]
    fn validate_invariants_rejects_count_mismatch() {
        let mut structure = small_structure();
        structure.metadata.atom_count = 3;
        assert!(structure.validate_invariants().is_err());
    }

    #[test]
    fn validate_invariants_rejects_duplicate_residue_ids_in_chain() {
        let mut structure = small_structure();
        structure.residues.push(Residue::new(1, "ALA", "A"));
        structure.chains[0].add_residue(1);
        structure.metadata.residue_count = 2;
        assert!(structure.validate_invariants().is_err());
    }
}
