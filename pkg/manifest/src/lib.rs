//! Manifest loader: reads a multi-document YAML file and decodes the RBAC
//! objects it contains into typed records.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod loader;

pub use config::{KindNames, LoaderConfig, RbacKind, SplitMode};
pub use error::{ErrorCategory, ManifestError};
pub use loader::{Manifests, load, load_str};
