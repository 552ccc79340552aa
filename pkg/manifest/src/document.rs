//! Cutting a manifest file into documents and decoding each one into its
//! generic YAML form.

use pkg_constants::manifest::DOCUMENT_SEPARATOR;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::config::{LoaderConfig, SplitMode};
use crate::error::ManifestError;

/// One decoded manifest document, alive only while it is being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// 1-based position in the file.
    pub index: usize,
    pub body: Mapping,
}

impl Document {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Top-level string field, empty when absent or not a string.
    pub fn str_field(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

/// Split `content` according to `config.split_mode` and decode every
/// candidate. The first decode failure aborts.
pub fn split_documents(content: &str, config: &LoaderConfig) -> Result<Vec<Document>, ManifestError> {
    match config.split_mode {
        SplitMode::Literal => split_literal(content, config.min_document_len),
        SplitMode::Stream => split_stream(content),
    }
}

/// Segments that still hold several documents were not cut on `---\n`,
/// usually because of CRLF line endings or a final `---` without newline.
fn literal_decode_reason(err: &serde_yaml::Error) -> String {
    let reason = err.to_string();
    if reason.contains("more than one document") {
        format!(
            "{} (documents must be separated by a '---' line ending in '\\n'; CRLF line endings are not split)",
            reason
        )
    } else {
        reason
    }
}

/// Interpret raw file bytes as UTF-8. Invalid bytes are a decode error
/// against the segment that contains them.
pub fn decode_utf8(bytes: &[u8]) -> Result<&str, ManifestError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        // the prefix is valid UTF-8 by construction
        let prefix = std::str::from_utf8(valid).unwrap_or_default();
        ManifestError::Decode {
            index: prefix.matches(DOCUMENT_SEPARATOR).count() + 1,
            reason: format!("invalid UTF-8 at byte offset {}", e.valid_up_to()),
        }
    })
}

fn split_literal(content: &str, min_len: usize) -> Result<Vec<Document>, ManifestError> {
    let mut documents = Vec::new();
    for (i, segment) in content.split(DOCUMENT_SEPARATOR).enumerate() {
        let index = i + 1;
        if segment.len() < min_len {
            debug!("Skipping manifest #{}: {} byte(s) of content", index, segment.len());
            continue;
        }
        let value: Value = serde_yaml::from_str(segment).map_err(|e| ManifestError::Decode {
            index,
            reason: literal_decode_reason(&e),
        })?;
        if let Some(body) = into_mapping(index, value)? {
            documents.push(Document { index, body });
        }
    }
    Ok(documents)
}

fn split_stream(content: &str) -> Result<Vec<Document>, ManifestError> {
    let mut documents = Vec::new();
    for (i, de) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let index = i + 1;
        let value = Value::deserialize(de).map_err(|e| ManifestError::Decode {
            index,
            reason: e.to_string(),
        })?;
        if let Some(body) = into_mapping(index, value)? {
            documents.push(Document { index, body });
        }
    }
    Ok(documents)
}

/// A document with no content (only comments, or nothing) yields `None`.
/// Merge keys (`<<`) are resolved first.
fn into_mapping(index: usize, mut value: Value) -> Result<Option<Mapping>, ManifestError> {
    value.apply_merge().map_err(|e| ManifestError::Decode {
        index,
        reason: e.to_string(),
    })?;
    match value {
        Value::Mapping(body) => Ok(Some(body)),
        Value::Null => {
            debug!("Skipping manifest #{}: document is empty", index);
            Ok(None)
        }
        other => Err(ManifestError::Decode {
            index,
            reason: format!("top level is {}, expected a mapping", describe(&other)),
        }),
    }
}

/// Short description of a value's shape for error messages.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn literal() -> LoaderConfig {
        LoaderConfig::default()
    }

    fn stream() -> LoaderConfig {
        LoaderConfig {
            split_mode: SplitMode::Stream,
            ..Default::default()
        }
    }

    #[test]
    fn literal_split_keeps_order_and_indexes() {
        let docs = split_documents("kind: A\n---\nkind: B\n---\nkind: C\n", &literal()).unwrap();
        let kinds: Vec<&str> = docs.iter().map(|d| d.str_field("kind")).collect();
        assert_eq!(kinds, vec!["A", "B", "C"]);
        assert_eq!(docs.iter().map(|d| d.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn literal_split_skips_short_segments() {
        let docs = split_documents("---\nkind: A\n---\n", &literal()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].index, 2);
    }

    #[test]
    fn literal_split_skips_comment_only_documents() {
        let docs = split_documents("# header\n---\nkind: A\n", &literal()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].str_field("kind"), "A");
    }

    #[test]
    fn literal_split_honors_min_len() {
        let cfg = LoaderConfig {
            min_document_len: 64,
            ..Default::default()
        };
        let docs = split_documents("kind: A\n---\nkind: B\n", &cfg).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn literal_split_cuts_inside_block_scalar() {
        let input = "kind: A\nnote: |\n  first\n---\n  second\n";
        let err = split_documents(input, &literal()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }

    #[test]
    fn stream_split_keeps_block_scalar_intact() {
        let input = "kind: A\nnote: |\n  first\n  ---\n  second\n---\nkind: B\n";
        let docs = split_documents(input, &stream()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].str_field("note"), "first\n---\nsecond\n");
        assert_eq!(docs[1].str_field("kind"), "B");
    }

    #[test]
    fn invalid_yaml_is_decode_error() {
        let err = split_documents("kind: A\n---\nkind: [B\n", &literal()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert_eq!(err.document_index(), Some(2));
    }

    #[test]
    fn scalar_document_is_decode_error() {
        let err = split_documents("just a string\n", &literal()).unwrap_err();
        assert!(err.to_string().contains("expected a mapping"));
    }

    #[test]
    fn str_field_is_lenient() {
        let docs = split_documents("kind: 7\napiVersion: v1\n", &literal()).unwrap();
        assert_eq!(docs[0].str_field("kind"), "");
        assert_eq!(docs[0].str_field("apiVersion"), "v1");
        assert_eq!(docs[0].str_field("missing"), "");
    }

    #[test]
    fn merge_keys_are_resolved() {
        let input = "base: &base\n  verbs: [get]\nrule:\n  <<: *base\n  resources: [pods]\n";
        let docs = split_documents(input, &literal()).unwrap();
        let rule = docs[0].get("rule").and_then(Value::as_mapping).unwrap();
        assert!(rule.get("<<").is_none());
        assert_eq!(rule.get("verbs").and_then(Value::as_sequence).map(Vec::len), Some(1));

        let docs = split_documents(input, &stream()).unwrap();
        let rule = docs[0].get("rule").and_then(Value::as_mapping).unwrap();
        assert!(rule.get("verbs").is_some());
    }

    #[test]
    fn bad_merge_value_is_decode_error() {
        let err = split_documents("rule:\n  <<: 5\n", &literal()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }

    #[test]
    fn crlf_separators_are_not_split() {
        let err = split_documents("kind: A\r\n---\r\nkind: B\r\n", &literal()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert_eq!(err.document_index(), Some(1));
        assert!(err.to_string().contains("CRLF"), "{}", err);
    }

    #[test]
    fn invalid_utf8_points_at_its_segment() {
        assert_eq!(decode_utf8(b"kind: A\n").unwrap(), "kind: A\n");

        let err = decode_utf8(b"kind: A\n---\nname: \xff\xfe\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert_eq!(err.document_index(), Some(2));
    }
}
