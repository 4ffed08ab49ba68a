//! mmCIF input: a generic data-block parser and the mapping from its categories to atoms,
//! metadata, secondary structure, and connectivity.

pub(crate) mod block;
pub(crate) mod reader;
