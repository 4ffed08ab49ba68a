//! Core data structures modeling a parsed molecular structure.
//!
//! This module defines the normalized atom, bond, residue, chain, and metadata types that every
//! reader produces. Cross references between them are plain indices into the owning
//! [`structure::MolecularStructure`] lists, which keeps the model flat and cheap to serialize.

pub mod atom;
pub mod chain;
pub mod metadata;
pub mod residue;
pub mod structure;
pub mod topology;
pub mod types;
