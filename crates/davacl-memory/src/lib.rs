//! # davacl-memory
//!
//! An in-memory resource tree for the DAV ACL engine.
//!
//! ## Overview
//!
//! [`InMemoryTree`] implements [`ResourceTree`](davacl_core::ResourceTree)
//! over [`MemoryNode`]s: plain collections, ACL-capable resources, and
//! principals. Trees are built in code or loaded from a TOML
//! [`TreeFixture`]. [`acl_digest`] gives a compact SHA-256 commitment to a
//! stored list, which makes "nothing changed" cheap to assert.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use davacl_memory::{InMemoryTree, MemoryNode};
//!
//! let tree = InMemoryTree::new()
//!     .with_node(MemoryNode::acl_node("test", Acl::default()))
//!     .with_node(MemoryNode::principal("principals/foo"));
//!
//! let before = tree.acl_digest("test");
//! engine.handle_acl_mutation(&tree, "/test", Some(proposed))?;
//! ```

pub mod digest;
pub mod fixture;
pub mod node;
pub mod tree;

pub use digest::acl_digest;
pub use fixture::{NodeFixture, TreeFixture};
pub use node::{MemoryNode, NodeKind};
pub use tree::InMemoryTree;

// ── Tests ─────────────────────────────────────────────────────────────────────
