//! Caching of parsed structures outside the parser.
//!
//! The parser itself never consults a cache. Callers that want to reuse results (an upload
//! route seeing the same file twice, a fetch route re-requesting an accession) wrap
//! [`load_structure`](super::load_structure) with [`load_cached`] and supply any
//! [`StructureCache`] implementation.

use super::config::LoadConfig;
use super::error::Error;
use super::load_structure;
use crate::model::structure::MolecularStructure;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Hex-encoded SHA-256 digest identifying a cached structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Keys a structure by the exact text it was parsed from.
    pub fn from_content(text: &str) -> Self {
        Self::digest(text.as_bytes())
    }

    /// Keys a structure by an external identifier such as a UniProt accession.
    ///
    /// Identifiers are upper-cased first so `p69905` and `P69905` share an entry.
    pub fn from_identifier(identifier: &str) -> Self {
        Self::digest(identifier.trim().to_ascii_uppercase().as_bytes())
    }

    fn digest(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Get/put storage for parsed structures.
///
/// Implementations must be shareable across threads; batch loading may call them
/// concurrently.
pub trait StructureCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<MolecularStructure>;

    fn put(&self, key: CacheKey, structure: MolecularStructure);
}

/// Unbounded in-process cache guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, MolecularStructure>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StructureCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<MolecularStructure> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: CacheKey, structure: MolecularStructure) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, structure);
        }
    }
}

/// Loads a structure, consulting `cache` by content hash first.
///
/// Only successful parses are stored; failures are returned every time so a rejected input is
/// never served from cache.
///
/// # Errors
///
/// Propagates any [`Error`] from [`load_structure`].
pub fn load_cached(
    cache: &dyn StructureCache,
    text: &str,
    filename: Option<&str>,
    config: &LoadConfig,
) -> Result<MolecularStructure, Error> {
    let key = CacheKey::from_content(text);
    if let Some(structure) = cache.get(&key) {
        log::debug!("cache hit for {key}");
        return Ok(structure);
    }

    let loaded = load_structure(text, filename, config)?;
    cache.put(key, loaded.structure.clone());
    Ok(loaded.structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDB: &str =
        "ATOM      1  CA  ALA A   1      11.104  13.207   2.123  1.00 20.00           C\n";

    #[test]
    fn content_keys_are_stable_sha256_hex() {
        let key = CacheKey::from_content("abc");
        assert_eq!(
            key.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(key, CacheKey::from_content("abc"));
        assert_ne!(key, CacheKey::from_content("abd"));
    }

    #[test]
    fn identifier_keys_ignore_case_and_padding() {
        assert_eq!(
            CacheKey::from_identifier(" p69905"),
            CacheKey::from_identifier("P69905")
        );
    }

    #[test]
    fn load_cached_stores_successful_parses() {
        let cache = MemoryCache::new();
        let config = LoadConfig::default();

        let first = load_cached(&cache, PDB, Some("a.pdb"), &config).unwrap();
        assert_eq!(cache.len(), 1);
        let second = load_cached(&cache, PDB, Some("a.pdb"), &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn load_cached_never_stores_failures() {
        let cache = MemoryCache::new();
        let result = load_cached(&cache, "nothing here", None, &LoadConfig::default());
        assert_eq!(result, Err(Error::UnknownFormat));
        assert!(cache.is_empty());
    }
}
