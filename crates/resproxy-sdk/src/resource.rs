//! Resource and ResourceResolver traits: the repository read contract
//!
//! A content store implements these two traits. The proxy engine programs
//! against them only and never sees the store's internals.

use std::fmt;
use std::sync::Arc;

use crate::value::ValueMap;

/// Shared handle to a repository node
pub type ResourceRef = Arc<dyn Resource>;

/// One repository node, read-only.
pub trait Resource: Send + Sync + fmt::Debug {
    /// Absolute, normalised path of this node
    fn path(&self) -> &str;

    /// Properties stored on this node
    fn value_map(&self) -> &ValueMap;

    /// Resolver this node was obtained from, used for absolute and relative
    /// lookups starting at this node
    fn resolver(&self) -> Arc<dyn ResourceResolver>;
}

/// Lookup of repository nodes by absolute path.
///
/// Missing nodes are reported as `None` / an empty list, never as errors.
pub trait ResourceResolver: Send + Sync {
    /// Get the node at an absolute path
    fn get_resource(&self, path: &str) -> Option<ResourceRef>;

    /// Direct children of the node at an absolute path, in repository order
    fn list_children(&self, path: &str) -> Vec<ResourceRef>;
}
