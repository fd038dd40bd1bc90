//! In-memory implementation of `ResourceTree`.
//!
//! `InMemoryTree` is the reference implementation of the `ResourceTree`
//! trait. It keeps nodes in a `BTreeMap` keyed by normalized path, each
//! behind an `Arc`, so handles returned by `lookup()` stay valid while the
//! engine works on them.

use std::collections::BTreeMap;
use std::sync::Arc;

use davacl_contracts::ace::Acl;
use davacl_core::{Resource, ResourceTree};

use crate::{
    digest::acl_digest,
    node::{MemoryNode, NodeKind},
};

/// A resource tree held entirely in memory.
///
/// Inserting a node also creates any missing ancestor as a plain collection,
/// so `principals/admin` implies `principals`.
#[derive(Debug, Default)]
pub struct InMemoryTree {
    nodes: BTreeMap<String, Arc<MemoryNode>>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, replacing any node already at its path.
    pub fn insert(&mut self, node: MemoryNode) -> Arc<MemoryNode> {
        let path = node.path().to_string();

        let mut ancestor = path.as_str();
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            self.nodes
                .entry(parent.to_string())
                .or_insert_with(|| Arc::new(MemoryNode::collection(parent)));
            ancestor = parent;
        }

        let node = Arc::new(node);
        self.nodes.insert(path, node.clone());
        node
    }

    pub fn with_node(mut self, node: MemoryNode) -> Self {
        self.insert(node);
        self
    }

    /// The concrete node at `path`, if any.
    pub fn node(&self, path: &str) -> Option<Arc<MemoryNode>> {
        self.nodes.get(path.trim_matches('/')).cloned()
    }

    /// Snapshot of the ACL stored at `path`; `None` unless it is an ACL node.
    pub fn acl(&self, path: &str) -> Option<Acl> {
        self.node(path)
            .filter(|n| n.kind() == NodeKind::Acl)
            .map(|n| n.stored_acl())
    }

    /// Digest of the ACL stored at `path`. See `acl_digest`.
    pub fn acl_digest(&self, path: &str) -> Option<String> {
        self.acl(path).map(|acl| acl_digest(&acl))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ResourceTree for InMemoryTree {
    fn lookup(&self, path: &str) -> Option<Arc<dyn Resource>> {
        self.node(path).map(|n| n as Arc<dyn Resource>)
    }
}
