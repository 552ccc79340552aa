//! Submission of loaded RBAC records to a cluster API.
//!
//! Records are created one at a time in a fixed order: roles, cluster roles,
//! role bindings, cluster role bindings. There are no retries and no
//! conflict handling; the first failure stops the run.

pub mod client;
pub mod http;
pub mod object;

pub use client::{ApplySummary, RbacClient, apply_manifests};
pub use http::HttpRbacClient;
pub use object::RbacObject;
