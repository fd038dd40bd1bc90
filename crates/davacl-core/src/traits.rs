//! Collaborator traits consumed by the ACL engine.
//!
//! - `Resource`              : a node of the resource tree (ACL subject or principal)
//! - `ResourceTree`          : path lookup owned by the storage layer
//! - `PrivilegeContribution` : a source of resource-specific privilege vocabulary
//!
//! The engine owns none of these. Storage is also the transaction boundary:
//! callers must serialize commits against the same resource.

use std::sync::Arc;

use davacl_contracts::{
    ace::Acl,
    error::{AclError, AclResult},
    privilege::Privilege,
};

/// A node of the resource tree.
///
/// Only nodes that report `has_acl_capability()` are ever asked for, or given,
/// an ACL. The default `acl`/`set_acl` bodies refuse, so plain collections and
/// principals need not implement them.
pub trait Resource: Send + Sync {
    /// Server-relative path without leading or trailing slashes.
    fn path(&self) -> &str;

    /// Resource type names (Clark notation), used to scope privilege
    /// contributions.
    fn resource_types(&self) -> Vec<String> {
        Vec::new()
    }

    /// True if this resource represents an identity that can hold privileges.
    fn is_principal(&self) -> bool {
        false
    }

    /// True if the resource can both report and replace its ACL.
    fn has_acl_capability(&self) -> bool {
        false
    }

    /// The currently stored ACL.
    fn acl(&self) -> AclResult<Acl> {
        Err(AclError::MethodNotAllowed {
            path: self.path().to_string(),
        })
    }

    /// Replace the stored ACL in full.
    ///
    /// Implementations surface storage rejections as `AclError::WriteFailed`.
    fn set_acl(&self, _acl: Acl) -> AclResult<()> {
        Err(AclError::MethodNotAllowed {
            path: self.path().to_string(),
        })
    }
}

/// Path lookup into the resource tree.
pub trait ResourceTree: Send + Sync {
    /// Return the resource at `path`, or `None` if nothing exists there.
    ///
    /// `path` is server-relative and already stripped of surrounding slashes.
    fn lookup(&self, path: &str) -> Option<Arc<dyn Resource>>;
}

/// A collaborator that extends the privilege vocabulary of a resource.
///
/// Called synchronously every time a hierarchy is resolved. Returned
/// privileges are merged by name over the built-in baseline, and later
/// contributions win.
pub trait PrivilegeContribution: Send + Sync {
    fn collect(&self, resource: &dyn Resource) -> Vec<Privilege>;
}

impl<F> PrivilegeContribution for F
where
    F: Fn(&dyn Resource) -> Vec<Privilege> + Send + Sync,
{
    fn collect(&self, resource: &dyn Resource) -> Vec<Privilege> {
        self(resource)
    }
}
