use super::types::SecondaryStructure;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Residue {
    pub id: i32,
    pub name: SmolStr,
    pub chain_id: SmolStr,
    pub atom_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_structure: Option<SecondaryStructure>,
}

impl Residue {
    pub fn new(id: i32, name: &str, chain_id: &str) -> Self {
        Self {
            id,
            name: SmolStr::new(name),
            chain_id: SmolStr::new(chain_id),
            atom_indices: Vec::new(),
            secondary_structure: None,
        }
    }

    pub fn add_atom(&mut self, atom_index: usize) {
        self.atom_indices.push(atom_index);
    }

    pub fn atom_count(&self) -> usize {
        self.atom_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_indices.is_empty()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary_structure {
            Some(ss) => write!(
                f,
                "Residue {{ id: {}, name: \"{}\", chain: \"{}\", atoms: {}, ss: {} }}",
                self.id,
                self.name,
                self.chain_id,
                self.atom_count(),
                ss
            ),
            None => write!(
                f,
                "Residue {{ id: {}, name: \"{}\", chain: \"{}\", atoms: {} }}",
                self.id,
                self.name,
                self.chain_id,
                self.atom_count()
            ),
        }
    }
}
