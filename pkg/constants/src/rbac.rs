//! RBAC API coordinates.

/// API group of every RBAC object.
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// `apiVersion` string written on objects built in code.
pub const RBAC_API_VERSION: &str = "rbac.authorization.k8s.io/v1";

/// REST prefix for the RBAC group on a Kubernetes-compatible API server.
pub const RBAC_API_PREFIX: &str = "/apis/rbac.authorization.k8s.io/v1";

// ─── Kinds ────────────────────────────────────────────────────────────────

pub const ROLE_KIND: &str = "Role";
pub const CLUSTER_ROLE_KIND: &str = "ClusterRole";
pub const ROLE_BINDING_KIND: &str = "RoleBinding";
pub const CLUSTER_ROLE_BINDING_KIND: &str = "ClusterRoleBinding";

// ─── Subjects ─────────────────────────────────────────────────────────────

pub const SERVICE_ACCOUNT_KIND: &str = "ServiceAccount";

/// Namespace used when a namespaced object does not declare one.
pub const DEFAULT_NAMESPACE: &str = "default";
