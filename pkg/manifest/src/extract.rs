//! Extraction of typed pieces from a generic manifest document.
//!
//! Metadata is read leniently: an absent or wrongly-typed field becomes the
//! field's zero value. Rules, role references and subjects are decoded
//! against their schema and a wrong shape is an error.

use chrono::{DateTime, Utc};
use pkg_types::meta::{ObjectMeta, TypeMeta};
use pkg_types::rbac::{AggregationRule, PolicyRule, RoleRef, Subject};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

use crate::document::{Document, describe};
use crate::error::ManifestError;

pub fn type_meta(doc: &Document) -> TypeMeta {
    TypeMeta {
        kind: doc.str_field("kind").to_string(),
        api_version: doc.str_field("apiVersion").to_string(),
    }
}

pub fn object_meta(doc: &Document) -> ObjectMeta {
    let Some(meta) = doc.get("metadata").and_then(Value::as_mapping) else {
        return ObjectMeta::default();
    };
    ObjectMeta {
        name: string(meta, "name"),
        generate_name: string(meta, "generateName"),
        namespace: string(meta, "namespace"),
        uid: string(meta, "uid"),
        resource_version: string(meta, "resourceVersion"),
        generation: meta
            .get("generation")
            .and_then(Value::as_i64)
            .unwrap_or_default(),
        creation_timestamp: timestamp(meta, "creationTimestamp"),
        deletion_timestamp: timestamp(meta, "deletionTimestamp"),
        deletion_grace_period_seconds: meta
            .get("deletionGracePeriodSeconds")
            .and_then(Value::as_i64),
        labels: string_map(meta, "labels"),
        annotations: string_map(meta, "annotations"),
        owner_references: lenient_list(meta, "ownerReferences"),
        finalizers: string_list(meta, "finalizers"),
        cluster_name: string(meta, "clusterName"),
        managed_fields: lenient_list(meta, "managedFields"),
    }
}

fn string(map: &Mapping, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn timestamp(map: &Mapping, key: &str) -> Option<DateTime<Utc>> {
    let raw = map.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// String-to-string entries only; other entries are dropped.
fn string_map(map: &Mapping, key: &str) -> BTreeMap<String, String> {
    let Some(entries) = map.get(key).and_then(Value::as_mapping) else {
        return BTreeMap::new();
    };
    entries
        .iter()
        .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
        .collect()
}

fn string_list(map: &Mapping, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Decode each element on its own, dropping the ones that don't fit `T`.
fn lenient_list<T: DeserializeOwned>(map: &Mapping, key: &str) -> Vec<T> {
    map.get(key)
        .and_then(Value::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| serde_yaml::from_value(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

// --- Typed sections ---

/// `rules` of a Role or ClusterRole. Absent, null or non-sequence values are
/// malformed. An empty sequence is accepted.
pub fn policy_rules(doc: &Document, kind: &str) -> Result<Vec<PolicyRule>, ManifestError> {
    let field = "rules";
    match doc.get(field) {
        None => Err(malformed(doc, kind, field, "key is absent".to_string())),
        Some(Value::Null) => Err(malformed(doc, kind, field, "value is null".to_string())),
        Some(value) => sequence_of(doc, kind, field, value),
    }
}

/// Optional `aggregationRule` of a ClusterRole.
pub fn aggregation_rule(doc: &Document, kind: &str) -> Result<Option<AggregationRule>, ManifestError> {
    match doc.get("aggregationRule") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => mapping_of(doc, kind, "aggregationRule", value).map(Some),
    }
}

/// Required `roleRef` and `subjects` of a RoleBinding or ClusterRoleBinding.
pub fn role_ref_and_subjects(
    doc: &Document,
    kind: &str,
) -> Result<(RoleRef, Vec<Subject>), ManifestError> {
    let role_ref = mapping_of(doc, kind, "roleRef", required(doc, kind, "roleRef")?)?;
    let subjects = sequence_of(doc, kind, "subjects", required(doc, kind, "subjects")?)?;
    Ok((role_ref, subjects))
}

fn required<'a>(doc: &'a Document, kind: &str, field: &'static str) -> Result<&'a Value, ManifestError> {
    match doc.get(field) {
        None | Some(Value::Null) => Err(ManifestError::MissingField {
            index: doc.index,
            kind: kind.to_string(),
            field,
        }),
        Some(value) => Ok(value),
    }
}

fn mapping_of<T: DeserializeOwned>(
    doc: &Document,
    kind: &str,
    field: &'static str,
    value: &Value,
) -> Result<T, ManifestError> {
    if !value.is_mapping() {
        return Err(malformed(
            doc,
            kind,
            field,
            format!("expected a mapping, found {}", describe(value)),
        ));
    }
    serde_yaml::from_value(value.clone()).map_err(|e| malformed(doc, kind, field, e.to_string()))
}

fn sequence_of<T: DeserializeOwned>(
    doc: &Document,
    kind: &str,
    field: &'static str,
    value: &Value,
) -> Result<Vec<T>, ManifestError> {
    let Some(items) = value.as_sequence() else {
        return Err(malformed(
            doc,
            kind,
            field,
            format!("expected a sequence, found {}", describe(value)),
        ));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_mapping() {
                return Err(malformed(
                    doc,
                    kind,
                    field,
                    format!("entry {} is {}, expected a mapping", i, describe(item)),
                ));
            }
            serde_yaml::from_value(item.clone())
                .map_err(|e| malformed(doc, kind, field, format!("entry {}: {}", i, e)))
        })
        .collect()
}

fn malformed(doc: &Document, kind: &str, field: &'static str, reason: String) -> ManifestError {
    ManifestError::MalformedRule {
        index: doc.index,
        kind: kind.to_string(),
        field,
        reason,
    }
}
