//! Centralized constants for rbacctl.
//!
//! Kind names, API coordinates and default paths live here so the loader,
//! the apply client and the CLI agree on them.

pub mod manifest;
pub mod paths;
pub mod rbac;
