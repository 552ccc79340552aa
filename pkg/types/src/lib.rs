//! Typed Kubernetes RBAC records and shared configuration types.

pub mod config;
pub mod meta;
pub mod rbac;
