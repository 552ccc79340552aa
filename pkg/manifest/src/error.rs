use std::io;
use std::path::PathBuf;

/// Coarse classification of a [`ManifestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Decode,
    MissingField,
    MalformedRule,
}

/// Every failure aborts the whole load. Document indexes are 1-based and
/// count split segments, including skipped empty ones.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest #{index} is not valid YAML: {reason}")]
    Decode { index: usize, reason: String },

    #[error("{kind} manifest #{index} is missing required key `{field}`")]
    MissingField {
        index: usize,
        kind: String,
        field: &'static str,
    },

    #[error("{kind} manifest #{index} has malformed `{field}`: {reason}")]
    MalformedRule {
        index: usize,
        kind: String,
        field: &'static str,
        reason: String,
    },
}

impl ManifestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ManifestError::Io { .. } => ErrorCategory::Io,
            ManifestError::Decode { .. } => ErrorCategory::Decode,
            ManifestError::MissingField { .. } => ErrorCategory::MissingField,
            ManifestError::MalformedRule { .. } => ErrorCategory::MalformedRule,
        }
    }

    /// Index of the offending document, if the error is tied to one.
    pub fn document_index(&self) -> Option<usize> {
        match self {
            ManifestError::Io { .. } => None,
            ManifestError::Decode { index, .. }
            | ManifestError::MissingField { index, .. }
            | ManifestError::MalformedRule { index, .. } => Some(*index),
        }
    }
}
