//! Legacy fixed-column PDB input.

pub(crate) mod reader;
