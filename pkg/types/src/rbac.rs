use pkg_constants::rbac::{
    CLUSTER_ROLE_BINDING_KIND, CLUSTER_ROLE_KIND, RBAC_API_GROUP, ROLE_BINDING_KIND, ROLE_KIND,
    SERVICE_ACCOUNT_KIND,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::meta::{ObjectMeta, TypeMeta};

// --- Policy rules ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRule {
    /// API groups this rule applies to (e.g., "" for core, "*" for all)
    pub api_groups: Vec<String>,
    /// Resource types (e.g., "pods", "services", "*" for all)
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_names: Vec<String>,
    #[serde(rename = "nonResourceURLs", skip_serializing_if = "Vec::is_empty")]
    pub non_resource_urls: Vec<String>,
    /// Allowed verbs (e.g., "get", "list", "create", "update", "delete", "*" for all)
    pub verbs: Vec<String>,
}

impl PolicyRule {
    pub fn new(api_groups: &[&str], resources: &[&str], verbs: &[&str]) -> Self {
        Self {
            api_groups: to_owned(api_groups),
            resources: to_owned(resources),
            verbs: to_owned(verbs),
            ..Default::default()
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

// --- Aggregation ---

/// Selects ClusterRoles whose rules are merged into an aggregated ClusterRole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationRule {
    pub cluster_role_selectors: Vec<LabelSelector>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelector {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelectorRequirement {
    pub key: String,
    /// One of `In`, `NotIn`, `Exists`, `DoesNotExist`.
    pub operator: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

// --- Role ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

impl Role {
    pub fn new(metadata: ObjectMeta, rules: Vec<PolicyRule>) -> Self {
        Self {
            type_meta: TypeMeta::rbac(ROLE_KIND),
            metadata,
            rules,
        }
    }
}

// --- ClusterRole ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRole {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_rule: Option<AggregationRule>,
}

impl ClusterRole {
    pub fn new(metadata: ObjectMeta, rules: Vec<PolicyRule>) -> Self {
        Self {
            type_meta: TypeMeta::rbac(CLUSTER_ROLE_KIND),
            metadata,
            rules,
            aggregation_rule: None,
        }
    }
}

// --- Role reference ---

/// The Role or ClusterRole a binding grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleRef {
    pub kind: String,
    pub name: String,
    pub api_group: String,
}

impl RoleRef {
    /// Reference into the RBAC API group.
    pub fn rbac(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            api_group: RBAC_API_GROUP.to_string(),
        }
    }
}

// --- Subject ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    /// `User`, `Group` or `ServiceAccount`
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_group: String,
}

impl Subject {
    pub fn service_account(name: &str, namespace: &str) -> Self {
        Self {
            kind: SERVICE_ACCOUNT_KIND.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            api_group: String::new(),
        }
    }
}

// --- RoleBinding ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub role_ref: RoleRef,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl RoleBinding {
    pub fn new(metadata: ObjectMeta, role_ref: RoleRef, subjects: Vec<Subject>) -> Self {
        Self {
            type_meta: TypeMeta::rbac(ROLE_BINDING_KIND),
            metadata,
            role_ref,
            subjects,
        }
    }
}

// --- ClusterRoleBinding ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub role_ref: RoleRef,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl ClusterRoleBinding {
    pub fn new(metadata: ObjectMeta, role_ref: RoleRef, subjects: Vec<Subject>) -> Self {
        Self {
            type_meta: TypeMeta::rbac(CLUSTER_ROLE_BINDING_KIND),
            metadata,
            role_ref,
            subjects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rule_wire_names() {
        let mut rule = PolicyRule::new(&[""], &["pods"], &["get"]);
        rule.non_resource_urls = vec!["/healthz".to_string()];
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["apiGroups"][0], "");
        assert_eq!(value["nonResourceURLs"][0], "/healthz");
        assert!(value.get("resourceNames").is_none());
    }

    #[test]
    fn policy_rule_missing_lists_default_empty() {
        let rule: PolicyRule = serde_yaml::from_str("verbs: [get]").unwrap();
        assert!(rule.api_groups.is_empty());
        assert!(rule.resources.is_empty());
        assert_eq!(rule.verbs, vec!["get"]);
    }

    #[test]
    fn role_serializes_flat_type_meta() {
        let role = Role::new(
            ObjectMeta::named("leader-election", "monitoring-system"),
            vec![PolicyRule::new(&[""], &["configmaps"], &["get", "list"])],
        );
        let value = serde_json::to_value(&role).unwrap();
        assert_eq!(value["kind"], "Role");
        assert_eq!(value["apiVersion"], "rbac.authorization.k8s.io/v1");
        assert_eq!(value["metadata"]["name"], "leader-election");
        assert_eq!(value["rules"][0]["resources"][0], "configmaps");
    }

    #[test]
    fn binding_builders() {
        let binding = ClusterRoleBinding::new(
            ObjectMeta::named("manager-rolebinding", ""),
            RoleRef::rbac("ClusterRole", "manager"),
            vec![Subject::service_account("vm-operator", "monitoring-system")],
        );
        assert_eq!(binding.type_meta.kind, "ClusterRoleBinding");
        assert_eq!(binding.role_ref.api_group, "rbac.authorization.k8s.io");
        assert_eq!(binding.subjects[0].kind, "ServiceAccount");

        let value = serde_json::to_value(&binding).unwrap();
        assert_eq!(value["roleRef"]["apiGroup"], "rbac.authorization.k8s.io");
        assert!(value["subjects"][0].get("apiGroup").is_none());
    }
}
