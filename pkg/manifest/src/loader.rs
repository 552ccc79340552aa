use pkg_types::rbac::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{LoaderConfig, RbacKind};
use crate::document::{decode_utf8, split_documents};
use crate::error::ManifestError;
use crate::extract;

/// Records decoded from one manifest file, each list in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifests {
    pub roles: Vec<Role>,
    pub cluster_roles: Vec<ClusterRole>,
    pub role_bindings: Vec<RoleBinding>,
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
}

impl Manifests {
    pub fn len(&self) -> usize {
        self.roles.len()
            + self.cluster_roles.len()
            + self.role_bindings.len()
            + self.cluster_role_bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read `path` and decode every RBAC object in it.
///
/// The file is read once. Any failure discards everything decoded so far.
pub fn load(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Manifests, ManifestError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifests = load_str(decode_utf8(&bytes)?, config)?;
    info!(
        "Loaded {} RBAC object(s) from {} ({} roles, {} cluster roles, {} role bindings, {} cluster role bindings)",
        manifests.len(),
        path.display(),
        manifests.roles.len(),
        manifests.cluster_roles.len(),
        manifests.role_bindings.len(),
        manifests.cluster_role_bindings.len()
    );
    Ok(manifests)
}

/// Decode every RBAC object in an in-memory manifest stream.
pub fn load_str(content: &str, config: &LoaderConfig) -> Result<Manifests, ManifestError> {
    let mut manifests = Manifests::default();

    for doc in split_documents(content, config)? {
        let type_meta = extract::type_meta(&doc);
        let metadata = extract::object_meta(&doc);
        let kind = type_meta.kind.clone();

        let Some(rbac_kind) = config.kinds.classify(&kind) else {
            debug!("Ignoring manifest #{} of kind '{}'", doc.index, kind);
            continue;
        };
        debug!("Decoding {} '{}' from manifest #{}", kind, metadata.name, doc.index);

        match rbac_kind {
            RbacKind::Role => {
                let rules = extract::policy_rules(&doc, &kind)?;
                manifests.roles.push(Role {
                    type_meta,
                    metadata,
                    rules,
                });
            }
            RbacKind::ClusterRole => {
                let rules = extract::policy_rules(&doc, &kind)?;
                let aggregation_rule = extract::aggregation_rule(&doc, &kind)?;
                manifests.cluster_roles.push(ClusterRole {
                    type_meta,
                    metadata,
                    rules,
                    aggregation_rule,
                });
            }
            RbacKind::RoleBinding => {
                let (role_ref, subjects) = extract::role_ref_and_subjects(&doc, &kind)?;
                manifests.role_bindings.push(RoleBinding {
                    type_meta,
                    metadata,
                    role_ref,
                    subjects,
                });
            }
            RbacKind::ClusterRoleBinding => {
                let (role_ref, subjects) = extract::role_ref_and_subjects(&doc, &kind)?;
                manifests.cluster_role_bindings.push(ClusterRoleBinding {
                    type_meta,
                    metadata,
                    role_ref,
                    subjects,
                });
            }
        }
    }

    Ok(manifests)
}
