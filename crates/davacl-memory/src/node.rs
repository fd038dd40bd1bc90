//! In-memory resource nodes.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use davacl_contracts::{
    ace::Acl,
    error::{AclError, AclResult},
};
use davacl_core::Resource;

/// What a node is, which decides the capabilities it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A plain container. No ACL capability, not a principal.
    Collection,
    /// A resource that stores an ACL and accepts replacements.
    Acl,
    /// A principal: an identity ACEs can name.
    Principal,
}

/// A single resource held by an `InMemoryTree`.
///
/// The stored ACL sits behind a `Mutex`, so concurrent commits against one
/// node are serialized at the write but not across the engine's
/// read-validate-write gap.
#[derive(Debug)]
pub struct MemoryNode {
    path: String,
    kind: NodeKind,
    resource_types: Vec<String>,
    read_only: bool,
    acl: Mutex<Acl>,
}

impl MemoryNode {
    /// Create a node at `path` (surrounding slashes are ignored).
    pub fn new(path: impl AsRef<str>, kind: NodeKind) -> Self {
        Self {
            path: path.as_ref().trim_matches('/').to_string(),
            kind,
            resource_types: Vec::new(),
            read_only: false,
            acl: Mutex::new(Acl::default()),
        }
    }

    pub fn collection(path: impl AsRef<str>) -> Self {
        Self::new(path, NodeKind::Collection)
    }

    pub fn acl_node(path: impl AsRef<str>, acl: Acl) -> Self {
        Self::new(path, NodeKind::Acl).with_acl(acl)
    }

    pub fn principal(path: impl AsRef<str>) -> Self {
        Self::new(path, NodeKind::Principal)
    }

    pub fn with_acl(self, acl: Acl) -> Self {
        Self {
            acl: Mutex::new(acl),
            ..self
        }
    }

    pub fn with_resource_types(
        mut self,
        types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.resource_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// A read-only node rejects every `set_acl` with `WriteFailed`.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Snapshot of the stored ACL.
    pub fn stored_acl(&self) -> Acl {
        // A poisoned lock still holds the last fully written list.
        self.acl
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Resource for MemoryNode {
    fn path(&self) -> &str {
        &self.path
    }

    fn resource_types(&self) -> Vec<String> {
        let mut types = self.resource_types.clone();
        if self.kind == NodeKind::Collection && !types.iter().any(|t| t == "{DAV:}collection") {
            types.push("{DAV:}collection".to_string());
        }
        types
    }

    fn is_principal(&self) -> bool {
        self.kind == NodeKind::Principal
    }

    fn has_acl_capability(&self) -> bool {
        self.kind == NodeKind::Acl
    }

    fn acl(&self) -> AclResult<Acl> {
        if !self.has_acl_capability() {
            return Err(AclError::MethodNotAllowed {
                path: self.path.clone(),
            });
        }
        Ok(self.stored_acl())
    }

    /// Swap in `acl` as the complete stored list.
    ///
    /// Returns `Err(WriteFailed)` for read-only nodes or a poisoned lock.
    fn set_acl(&self, acl: Acl) -> AclResult<()> {
        if !self.has_acl_capability() {
            return Err(AclError::MethodNotAllowed {
                path: self.path.clone(),
            });
        }
        if self.read_only {
            return Err(AclError::WriteFailed {
                path: self.path.clone(),
                reason: "node is read-only".to_string(),
            });
        }

        let mut stored = self.acl.lock().map_err(|e| AclError::WriteFailed {
            path: self.path.clone(),
            reason: format!("node ACL lock poisoned: {}", e),
        })?;

        debug!(path = %self.path, entries = acl.len(), "storing ACL");
        *stored = acl;

        Ok(())
    }
}
