use anyhow::{Context, Result};
use async_trait::async_trait;
use pkg_manifest::Manifests;
use tracing::{info, warn};

use crate::object::RbacObject;

/// Something that can create RBAC objects on a cluster.
#[async_trait]
pub trait RbacClient: Send + Sync {
    /// Create one object. Existing objects are the implementation's problem.
    async fn create(&self, object: RbacObject<'_>) -> Result<()>;
}

/// Counts of objects created by [`apply_manifests`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub roles: usize,
    pub cluster_roles: usize,
    pub role_bindings: usize,
    pub cluster_role_bindings: usize,
}

impl ApplySummary {
    pub fn total(&self) -> usize {
        self.roles + self.cluster_roles + self.role_bindings + self.cluster_role_bindings
    }
}

/// Create every record in `manifests`, roles first and cluster role bindings
/// last, stopping at the first failure.
pub async fn apply_manifests(client: &dyn RbacClient, manifests: &Manifests) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for role in &manifests.roles {
        submit(client, RbacObject::Role(role)).await?;
        summary.roles += 1;
    }
    for role in &manifests.cluster_roles {
        submit(client, RbacObject::ClusterRole(role)).await?;
        summary.cluster_roles += 1;
    }
    for binding in &manifests.role_bindings {
        submit(client, RbacObject::RoleBinding(binding)).await?;
        summary.role_bindings += 1;
    }
    for binding in &manifests.cluster_role_bindings {
        submit(client, RbacObject::ClusterRoleBinding(binding)).await?;
        summary.cluster_role_bindings += 1;
    }

    info!("Applied {} RBAC object(s)", summary.total());
    Ok(summary)
}

async fn submit(client: &dyn RbacClient, object: RbacObject<'_>) -> Result<()> {
    let kind = object.kind().to_string();
    let name = object.name().to_string();
    if let Err(e) = client.create(object).await {
        warn!("Failed to create {} '{}': {}", kind, name, e);
        return Err(e).with_context(|| format!("failed to create {} '{}'", kind, name));
    }
    info!("Created {} '{}'", kind, name);
    Ok(())
}
