//! Pre-parse checks on raw upload text and the filename sanitizer for the upload route.
//!
//! Every check here runs before any structural parsing and fails the whole call; there is no
//! partial result.

use crate::io::detect::{Format, scan_indicators};
use crate::io::error::Error;

/// Longest filename kept by [`sanitize_filename`], in characters.
pub const MAX_FILENAME_LEN: usize = 255;

/// Substring patterns matched case-insensitively, with the description reported on a hit.
const SUBSTRING_PATTERNS: &[(&str, &str)] = &[
    ("<script", "embedded script tag"),
    ("javascript:", "javascript: URL"),
    ("eval(", "eval( call"),
];

/// Rejects input longer than `limit` bytes.
///
/// # Errors
///
/// Returns [`Error::SizeLimitExceeded`] when `text.len() > limit`. Input of exactly `limit`
/// bytes passes.
pub fn check_size(text: &str, limit: usize) -> Result<(), Error> {
    if text.len() > limit {
        return Err(Error::SizeLimitExceeded {
            size: text.len(),
            limit,
        });
    }
    Ok(())
}

/// Scans raw text for markup and script injection patterns.
///
/// Matches are case-insensitive and cover script tags, inline event-handler attributes,
/// `javascript:` URLs, `eval(` call sites, and NUL bytes.
///
/// # Errors
///
/// Returns [`Error::ContentSafetyViolation`] naming the first pattern family found.
pub fn check_content_safety(text: &str) -> Result<(), Error> {
    let bytes = text.as_bytes();

    if bytes.contains(&0) {
        return Err(Error::ContentSafetyViolation {
            pattern: "NUL byte",
        });
    }

    for &(needle, pattern) in SUBSTRING_PATTERNS {
        if find_ignore_case(bytes, needle.as_bytes()).is_some() {
            return Err(Error::ContentSafetyViolation { pattern });
        }
    }

    if contains_event_handler(bytes) {
        return Err(Error::ContentSafetyViolation {
            pattern: "inline event handler",
        });
    }

    Ok(())
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Looks for an inline `on<name>=` attribute inside an open markup tag.
///
/// A tag opens at `<` followed by a letter and closes at `>`. Within it, `on` preceded by
/// whitespace, a quote, or `/`, then one or more letters, optional blanks, and `=` is a
/// handler. Any event name counts. Plain record text outside a tag never matches, so
/// `CONFORMATION ONE = 2` is left alone.
fn contains_event_handler(bytes: &[u8]) -> bool {
    let mut in_tag = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => in_tag = bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic),
            b'>' => in_tag = false,
            b'o' | b'O' if in_tag && i > 0 && is_attribute_separator(bytes[i - 1]) => {
                let starts_on = bytes.get(i + 1).is_some_and(|n| n.eq_ignore_ascii_case(&b'n'));
                if starts_on && is_handler_assignment(&bytes[i + 2..]) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn is_attribute_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'/')
}

/// `rest` begins right after `on`: letters, then optional blanks, then `=`.
fn is_handler_assignment(rest: &[u8]) -> bool {
    let name_len = rest.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    name_len > 0
        && rest[name_len..]
            .iter()
            .find(|&&b| b != b' ' && b != b'\t')
            .is_some_and(|&b| b == b'=')
}

/// Checks that text contains the indicator its filename extension promises.
///
/// Filenames without a recognized extension skip the check.
///
/// # Errors
///
/// Returns [`Error::FormatMismatch`] when a `.pdb`/`.ent` file has no legacy record indicator
/// or a `.cif`/`.mmcif` file has no `data_` line.
pub fn check_format_markers(text: &str, filename: &str) -> Result<(), Error> {
    let Some(expected) = Format::from_filename(filename) else {
        return Ok(());
    };
    let indicators = scan_indicators(text);
    let present = match expected {
        Format::Legacy => indicators.legacy,
        Format::Tag => indicators.tag,
        Format::Unknown => true,
    };
    if present {
        Ok(())
    } else {
        Err(Error::format_mismatch(filename, expected.name()))
    }
}

/// Strips a client-supplied filename to `[A-Za-z0-9._-]` and at most
/// [`MAX_FILENAME_LEN`] characters.
///
/// # Examples
///
/// ```
/// use molload::io::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../my file<1>.pdb"), "..myfile1.pdb");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .take(MAX_FILENAME_LEN)
        .collect()
}
