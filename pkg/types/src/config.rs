use serde::{Deserialize, Serialize};

/// rbacctl configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// server: https://10.0.0.1:6443
/// token: my-secret-token
/// split-mode: stream
/// kinds:
///   role: Role
///   cluster-role: ClusterRole
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CtlConfigFile {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// `literal` or `stream`
    #[serde(default, alias = "split-mode")]
    pub split_mode: Option<String>,
    #[serde(default, alias = "min-document-len")]
    pub min_document_len: Option<usize>,
    #[serde(default)]
    pub kinds: KindOverrides,
}

/// Per-kind overrides of the names the loader dispatches on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindOverrides {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "cluster-role")]
    pub cluster_role: Option<String>,
    #[serde(default, alias = "role-binding")]
    pub role_binding: Option<String>,
    #[serde(default, alias = "cluster-role-binding")]
    pub cluster_role_binding: Option<String>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
