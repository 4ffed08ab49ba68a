//! Canonical error type for every load, validation, and parse failure.
//!
//! Each variant is terminal for the current call. Per-record problems (a malformed atom line,
//! a short loop row, a dangling bond) are never errors; they are counted in
//! [`SkippedRecords`](super::SkippedRecords) instead.

use thiserror::Error;

/// Errors that can occur while validating or parsing structure text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Input exceeded the configured maximum; parsing was never attempted.
    #[error("input of {size} bytes exceeds the maximum of {limit} bytes")]
    SizeLimitExceeded {
        /// Length of the rejected input in bytes.
        size: usize,
        /// Configured maximum in bytes.
        limit: usize,
    },

    /// Input contains embedded markup or script patterns.
    #[error("input rejected by content-safety check: found {pattern}")]
    ContentSafetyViolation {
        /// Description of the pattern that matched.
        pattern: &'static str,
    },

    /// The filename extension promises a format whose markers are absent.
    #[error("file '{filename}' does not contain the markers expected for {expected} content")]
    FormatMismatch {
        filename: String,
        /// Name of the format implied by the extension (`"PDB"` or `"mmCIF"`).
        expected: &'static str,
    },

    /// Neither or both sets of format indicators were found.
    #[error("unable to determine structure format: expected either PDB records or an mmCIF data block")]
    UnknownFormat,

    /// Parsing succeeded structurally but produced no atoms.
    #[error("{format} input contains no usable atom records")]
    EmptyStructure { format: &'static str },

    /// Unexpected structural failure while parsing.
    #[error("failed to parse {format} input: {details} (line {line_number})")]
    Parse {
        /// Name of the textual format (e.g., `"PDB"`, `"mmCIF"`).
        format: &'static str,
        /// One-based line number where parsing failed.
        line_number: usize,
        /// Human-readable description of what went wrong.
        details: String,
    },
}

impl Error {
    /// Builds a [`Error::Parse`] variant with consistent messaging.
    ///
    /// # Arguments
    ///
    /// * `format` - Name of the textual format being parsed.
    /// * `line_number` - Line where the failure occurred (1-indexed).
    /// * `details` - Additional context about the parsing problem.
    pub fn parse(format: &'static str, line_number: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line_number,
            details: details.into(),
        }
    }

    /// Generates an [`Error::FormatMismatch`] for a declared filename.
    pub fn format_mismatch(filename: impl Into<String>, expected: &'static str) -> Self {
        Self::FormatMismatch {
            filename: filename.into(),
            expected,
        }
    }

    /// Returns `true` when the failure is attributable to the submitted input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Parse { .. })
    }

    /// HTTP status an upload or fetch route should answer with.
    ///
    /// Oversized input maps to 413, other validation failures to 400, and unexpected parse
    /// failures to 500.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::SizeLimitExceeded { .. } => 413,
            Self::Parse { .. } => 500,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_follows_route_contract() {
        assert_eq!(
            Error::SizeLimitExceeded { size: 2, limit: 1 }.http_status(),
            413
        );
        assert_eq!(
            Error::ContentSafetyViolation { pattern: "script tag" }.http_status(),
            400
        );
        assert_eq!(Error::format_mismatch("a.cif", "mmCIF").http_status(), 400);
        assert_eq!(Error::UnknownFormat.http_status(), 400);
        assert_eq!(Error::EmptyStructure { format: "PDB" }.http_status(), 400);
        assert_eq!(Error::parse("mmCIF", 3, "boom").http_status(), 500);
    }

    #[test]
    fn only_parse_errors_are_server_side() {
        assert!(Error::UnknownFormat.is_client_error());
        assert!(!Error::parse("PDB", 1, "x").is_client_error());
    }

    #[test]
    fn messages_include_context() {
        let err = Error::parse("mmCIF", 42, "_atom_site.Cartn_x column is required");
        assert_eq!(
            err.to_string(),
            "failed to parse mmCIF input: _atom_site.Cartn_x column is required (line 42)"
        );

        let err = Error::format_mismatch("structure.cif", "mmCIF");
        assert_eq!(
            err.to_string(),
            "file 'structure.cif' does not contain the markers expected for mmCIF content"
        );
    }
}
