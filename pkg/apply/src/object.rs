use pkg_constants::rbac::{DEFAULT_NAMESPACE, RBAC_API_PREFIX};
use pkg_types::meta::ObjectMeta;
use pkg_types::rbac::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};

/// A borrowed view of one record ready for submission.
#[derive(Debug, Clone, Copy)]
pub enum RbacObject<'a> {
    Role(&'a Role),
    ClusterRole(&'a ClusterRole),
    RoleBinding(&'a RoleBinding),
    ClusterRoleBinding(&'a ClusterRoleBinding),
}

impl RbacObject<'_> {
    pub fn kind(&self) -> &str {
        match self {
            RbacObject::Role(r) => &r.type_meta.kind,
            RbacObject::ClusterRole(r) => &r.type_meta.kind,
            RbacObject::RoleBinding(r) => &r.type_meta.kind,
            RbacObject::ClusterRoleBinding(r) => &r.type_meta.kind,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            RbacObject::Role(r) => &r.metadata,
            RbacObject::ClusterRole(r) => &r.metadata,
            RbacObject::RoleBinding(r) => &r.metadata,
            RbacObject::ClusterRoleBinding(r) => &r.metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    /// REST collection the object is POSTed to. Namespaced kinds without a
    /// namespace go to `default`.
    pub fn collection_path(&self) -> String {
        match self {
            RbacObject::Role(_) => format!("{}/namespaces/{}/roles", RBAC_API_PREFIX, self.namespace()),
            RbacObject::RoleBinding(_) => format!(
                "{}/namespaces/{}/rolebindings",
                RBAC_API_PREFIX,
                self.namespace()
            ),
            RbacObject::ClusterRole(_) => format!("{}/clusterroles", RBAC_API_PREFIX),
            RbacObject::ClusterRoleBinding(_) => format!("{}/clusterrolebindings", RBAC_API_PREFIX),
        }
    }

    fn namespace(&self) -> &str {
        let ns = self.metadata().namespace.as_str();
        if ns.is_empty() { DEFAULT_NAMESPACE } else { ns }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            RbacObject::Role(r) => serde_json::to_value(r),
            RbacObject::ClusterRole(r) => serde_json::to_value(r),
            RbacObject::RoleBinding(r) => serde_json::to_value(r),
            RbacObject::ClusterRoleBinding(r) => serde_json::to_value(r),
        }
    }
}
