//! In-memory repository
//!
//! A [`ResourceResolver`] backed by a path-indexed tree. Used by tests and by
//! embedders that want to bind proxies to data that does not live in a real
//! content store.
//!
//! Every read through the contract (`get_resource`, `list_children`,
//! `Resource::value_map`) is counted, so callers can observe how often the
//! repository was actually consulted.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{RepoResult, RepositoryError};
use crate::path;
use crate::resource::{Resource, ResourceRef, ResourceResolver};
use crate::value::ValueMap;

#[derive(Debug)]
struct Node {
    path: String,
    properties: ValueMap,
}

#[derive(Default)]
struct Tree {
    nodes: FxHashMap<String, Arc<Node>>,
    /// Child paths per parent, in insertion order
    children: FxHashMap<String, Vec<String>>,
}

struct Store {
    tree: RwLock<Tree>,
    reads: AtomicUsize,
}

/// In-memory content repository. Cloning shares the same tree.
#[derive(Clone)]
pub struct MemoryRepository {
    store: Arc<Store>,
}

impl MemoryRepository {
    /// Create a repository holding only the root node
    pub fn new() -> Self {
        let mut tree = Tree::default();
        tree.nodes.insert(
            path::ROOT.to_string(),
            Arc::new(Node {
                path: path::ROOT.to_string(),
                properties: ValueMap::new(),
            }),
        );
        Self {
            store: Arc::new(Store {
                tree: RwLock::new(tree),
                reads: AtomicUsize::new(0),
            }),
        }
    }

    /// Add a node, creating missing ancestors with no properties.
    ///
    /// Adding an existing path replaces its properties and keeps its
    /// children.
    pub fn add(&self, path: &str, properties: ValueMap) -> RepoResult<ResourceRef> {
        let path = path::normalize(path).ok_or_else(|| RepositoryError::InvalidPath(path.to_string()))?;

        let mut tree = self.store.tree.write();
        let mut missing = Vec::new();
        let mut cursor = path::parent(&path);
        while let Some(ancestor) = cursor {
            if tree.nodes.contains_key(ancestor) {
                break;
            }
            missing.push(ancestor.to_string());
            cursor = path::parent(ancestor);
        }
        for ancestor in missing.into_iter().rev() {
            Self::insert_node(&mut tree, ancestor, ValueMap::new());
        }

        let node = Self::insert_node(&mut tree, path, properties);
        Ok(self.wrap(node))
    }

    fn insert_node(tree: &mut Tree, path: String, properties: ValueMap) -> Arc<Node> {
        let is_new = !tree.nodes.contains_key(&path);
        if is_new {
            if let Some(parent) = path::parent(&path) {
                tree.children
                    .entry(parent.to_string())
                    .or_default()
                    .push(path.clone());
            }
        }
        let node = Arc::new(Node {
            path: path.clone(),
            properties,
        });
        tree.nodes.insert(path, node.clone());
        node
    }

    /// Fetch a node without counting a read (fixture access)
    pub fn resource(&self, path: &str) -> Option<ResourceRef> {
        let path = path::normalize(path)?;
        let node = self.store.tree.read().nodes.get(&path).cloned()?;
        Some(self.wrap(node))
    }

    /// Resolver handle for this repository
    pub fn resolver(&self) -> Arc<dyn ResourceResolver> {
        Arc::new(self.clone())
    }

    /// Number of reads served since creation or the last reset
    pub fn read_count(&self) -> usize {
        self.store.reads.load(Ordering::Relaxed)
    }

    /// Reset the read counter
    pub fn reset_reads(&self) {
        self.store.reads.store(0, Ordering::Relaxed);
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.store.tree.read().nodes.len()
    }

    /// Whether only the root exists
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn count_read(&self) {
        self.store.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn wrap(&self, node: Arc<Node>) -> ResourceRef {
        Arc::new(MemoryResource {
            node,
            repo: self.clone(),
        })
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("nodes", &self.len())
            .field("reads", &self.read_count())
            .finish()
    }
}

impl ResourceResolver for MemoryRepository {
    fn get_resource(&self, path: &str) -> Option<ResourceRef> {
        self.count_read();
        self.resource(path)
    }

    fn list_children(&self, path: &str) -> Vec<ResourceRef> {
        self.count_read();
        let Some(path) = path::normalize(path) else {
            return Vec::new();
        };
        let tree = self.store.tree.read();
        tree.children
            .get(&path)
            .map(|paths| {
                paths
                    .iter()
                    .filter_map(|p| tree.nodes.get(p).cloned())
                    .map(|node| self.wrap(node))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A node of a [`MemoryRepository`]
struct MemoryResource {
    node: Arc<Node>,
    repo: MemoryRepository,
}

impl fmt::Debug for MemoryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryResource")
            .field("path", &self.node.path)
            .finish()
    }
}

impl Resource for MemoryResource {
    fn path(&self) -> &str {
        &self.node.path
    }

    fn value_map(&self) -> &ValueMap {
        self.repo.count_read();
        &self.node.properties
    }

    fn resolver(&self) -> Arc<dyn ResourceResolver> {
        self.repo.resolver()
    }
}
