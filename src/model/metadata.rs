//! Descriptive, non-authoritative metadata attached to a parsed structure.
//!
//! Typed fields cover what both file formats can express (identifier, title, resolution,
//! method, deposition date, authors, organisms). Anything else a caller wants to attach lives
//! in [`StructureMetadata::extensions`], which never feeds back into the typed fields or the
//! derived counts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Extension key marking a structure as a computational (predicted) model.
pub const COMPUTATIONAL_MODEL_KEY: &str = "isComputationalModel";
/// Extension key holding the attribution of a fetched structure.
pub const SOURCE_KEY: &str = "source";
/// Extension key holding the `HEADER` classification / `_struct_keywords.pdbx_keywords`.
pub const CLASSIFICATION_KEY: &str = "classification";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Resolution in ångströms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposition_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organisms: Vec<String>,
    #[serde(default)]
    pub chain_ids: Vec<String>,
    /// Always equal to the length of the structure's atom list.
    #[serde(default)]
    pub atom_count: usize,
    /// Always equal to the length of the structure's residue list.
    #[serde(default)]
    pub residue_count: usize,
    /// Open-ended, loosely typed annotations kept apart from the typed fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl StructureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a loosely typed annotation under `key`, returning any previous value.
    pub fn set_extension(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.extensions.insert(key.into(), value.into())
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Flags the structure as a computational model and records where it came from.
    ///
    /// Fetch services call this after parsing predicted models (e.g. AlphaFold DB entries) so
    /// renderers can label them.
    ///
    /// # Arguments
    ///
    /// * `source` - Human-readable attribution such as `"AlphaFold DB"`.
    pub fn mark_computational_model(&mut self, source: &str) {
        self.set_extension(COMPUTATIONAL_MODEL_KEY, true);
        self.set_extension(SOURCE_KEY, source);
    }

    pub fn is_computational_model(&self) -> bool {
        self.extension(COMPUTATIONAL_MODEL_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
