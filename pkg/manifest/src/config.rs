use pkg_constants::manifest::MIN_DOCUMENT_LEN;
use pkg_constants::rbac::{
    CLUSTER_ROLE_BINDING_KIND, CLUSTER_ROLE_KIND, ROLE_BINDING_KIND, ROLE_KIND,
};
use std::fmt;
use std::str::FromStr;

/// How a manifest file is cut into documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// Split on the literal `---\n` substring. A `---` line inside a block
    /// scalar is treated as a separator.
    #[default]
    Literal,
    /// Full YAML multi-document decode.
    Stream,
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "literal" => Ok(SplitMode::Literal),
            "stream" => Ok(SplitMode::Stream),
            other => Err(format!(
                "unknown split mode '{}' (expected 'literal' or 'stream')",
                other
            )),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::Literal => write!(f, "literal"),
            SplitMode::Stream => write!(f, "stream"),
        }
    }
}

/// The four record types the loader produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RbacKind {
    Role,
    ClusterRole,
    RoleBinding,
    ClusterRoleBinding,
}

/// Kind strings the loader dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindNames {
    pub role: String,
    pub cluster_role: String,
    pub role_binding: String,
    pub cluster_role_binding: String,
}

impl Default for KindNames {
    fn default() -> Self {
        Self {
            role: ROLE_KIND.to_string(),
            cluster_role: CLUSTER_ROLE_KIND.to_string(),
            role_binding: ROLE_BINDING_KIND.to_string(),
            cluster_role_binding: CLUSTER_ROLE_BINDING_KIND.to_string(),
        }
    }
}

impl KindNames {
    /// Map a declared `kind` to a record type. Matching is exact.
    pub fn classify(&self, kind: &str) -> Option<RbacKind> {
        if kind.is_empty() {
            None
        } else if kind == self.role {
            Some(RbacKind::Role)
        } else if kind == self.cluster_role {
            Some(RbacKind::ClusterRole)
        } else if kind == self.role_binding {
            Some(RbacKind::RoleBinding)
        } else if kind == self.cluster_role_binding {
            Some(RbacKind::ClusterRoleBinding)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub kinds: KindNames,
    pub split_mode: SplitMode,
    /// Literal-mode segments shorter than this many bytes are skipped.
    pub min_document_len: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            kinds: KindNames::default(),
            split_mode: SplitMode::default(),
            min_document_len: MIN_DOCUMENT_LEN,
        }
    }
}
