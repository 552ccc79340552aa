//! Manifest splitting constants.

/// Literal line that separates documents in a manifest file.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Split segments shorter than this many bytes carry no content and are skipped.
pub const MIN_DOCUMENT_LEN: usize = 2;
