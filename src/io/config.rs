use serde::{Deserialize, Serialize};

/// Default maximum input size: 50 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Limits applied by [`load_structure`](super::load_structure).
///
/// Deserializes from TOML with every field optional:
///
/// ```toml
/// max_input_bytes = 10485760
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Largest accepted input, in bytes. Input of exactly this length is accepted.
    pub max_input_bytes: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl LoadConfig {
    /// Parses a configuration from TOML text, filling unspecified fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the TOML deserialization error for malformed text or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }
}
