//! TOML tree fixtures.
//!
//! A fixture describes a whole tree: its base URI and every node with its
//! kind and stored ACL. The same file may also carry `[[privileges]]`
//! declarations for davacl-privilege; those tables are ignored here.
//!
//! Example:
//! ```toml
//! base_uri = "/"
//!
//! [[nodes]]
//! path = "test"
//! kind = "acl"
//! acl = [
//!     { principal = "principals/foo", privilege = "{DAV:}write", protected = true },
//! ]
//!
//! [[nodes]]
//! path = "principals/foo"
//! kind = "principal"
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use davacl_contracts::{
    ace::{Ace, Acl},
    error::{AclError, AclResult},
};

use crate::{
    node::{MemoryNode, NodeKind},
    tree::InMemoryTree,
};

fn default_base_uri() -> String {
    "/".to_string()
}

/// One node of a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeFixture {
    pub path: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub resource_types: Vec<String>,
    /// Stored ACL. Only valid on `kind = "acl"` nodes.
    #[serde(default)]
    pub acl: Vec<Ace>,
    #[serde(default)]
    pub read_only: bool,
}

/// The top-level structure deserialized from a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeFixture {
    /// Base URI stripped from hrefs by the engine.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    #[serde(default)]
    pub nodes: Vec<NodeFixture>,
}

impl TreeFixture {
    /// Parse `s` as a TOML fixture.
    ///
    /// Returns `AclError::ConfigError` if the TOML is malformed or does not
    /// match the `TreeFixture` schema.
    pub fn from_toml_str(s: &str) -> AclResult<Self> {
        toml::from_str(s).map_err(|e| AclError::ConfigError {
            reason: format!("failed to parse tree fixture: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a fixture.
    pub fn from_file(path: &Path) -> AclResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AclError::ConfigError {
            reason: format!("failed to read tree fixture '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build the tree this fixture describes.
    ///
    /// Fails with `ConfigError` when two nodes share a path or an ACL is
    /// attached to a node that cannot store one.
    pub fn build(&self) -> AclResult<InMemoryTree> {
        let mut tree = InMemoryTree::new();
        let mut seen = BTreeSet::new();

        for fixture in &self.nodes {
            let path = fixture.path.trim_matches('/');

            if !seen.insert(path) {
                return Err(AclError::ConfigError {
                    reason: format!("fixture declares node '{}' more than once", path),
                });
            }
            if !fixture.acl.is_empty() && fixture.kind != NodeKind::Acl {
                return Err(AclError::ConfigError {
                    reason: format!("node '{}' has an ACL but is not an ACL node", path),
                });
            }

            tree.insert(
                MemoryNode::new(path, fixture.kind)
                    .with_resource_types(fixture.resource_types.iter().cloned())
                    .with_acl(Acl::new(fixture.acl.clone()))
                    .read_only(fixture.read_only),
            );
        }

        debug!(nodes = tree.len(), "fixture tree built");
        Ok(tree)
    }
}
