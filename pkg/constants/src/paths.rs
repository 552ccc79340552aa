//! Filesystem and endpoint defaults.

/// Default config file path for rbacctl.
pub const DEFAULT_CTL_CONFIG: &str = "/etc/rbacctl/config.yaml";

/// Default API server endpoint used by `rbacctl apply`.
pub const DEFAULT_API_SERVER: &str = "https://127.0.0.1:6443";
