//! The ACL commit engine: validate a proposed list, then replace the stored one.
//!
//! The engine enforces the mutation pipeline:
//!
//!   Parse → Lookup → Capability → Hierarchy → Conflict → Validate → Commit
//!
//! Every stage before Commit is a read-only probe, and the first failure
//! aborts the request. `Resource::set_acl()` is therefore only reachable once
//! every proposed entry has passed, so a request is applied in full or not
//! at all.
//!
//! The engine takes no locks. It reads the stored ACL and later writes the
//! new one without holding anything across the gap; callers must serialize
//! commits per resource.

use chrono::Utc;
use tracing::{debug, info, warn};

use davacl_contracts::{
    ace::{Ace, Acl},
    error::{AclError, AclResult},
    privilege::PrivilegeHierarchy,
    receipt::CommitReceipt,
};

use crate::{
    conflict, hierarchy,
    principal::{normalize_href, PrincipalResolver},
    traits::{PrivilegeContribution, Resource, ResourceTree},
};

/// Validates and commits ACL replacements.
///
/// Holds the registered privilege contributions and the server base URI used
/// to normalize principal hrefs. It keeps no per-request state, so one engine
/// can serve every request.
pub struct AclEngine {
    contributions: Vec<Box<dyn PrivilegeContribution>>,
    base_uri: String,
}

impl AclEngine {
    /// Create an engine with the given privilege contributions and base URI `/`.
    pub fn new(contributions: Vec<Box<dyn PrivilegeContribution>>) -> Self {
        Self {
            contributions,
            base_uri: "/".to_string(),
        }
    }

    /// Set the base URI stripped from incoming hrefs and paths.
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    /// Register one more contribution. It is consulted after the existing ones.
    pub fn with_contribution(mut self, contribution: Box<dyn PrivilegeContribution>) -> Self {
        self.contributions.push(contribution);
        self
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Resolve the privilege hierarchy `resource` supports right now.
    pub fn privileges(&self, resource: &dyn Resource) -> PrivilegeHierarchy {
        hierarchy::resolve(resource, &self.contributions)
    }

    /// Entry point for the protocol dispatcher.
    ///
    /// `proposed` is the decoded request body; `None` means the request
    /// carried no usable payload. Returns a receipt once the request has been
    /// fully handled.
    ///
    /// # Errors
    ///
    /// - `BadRequest` when `proposed` is `None`, before any resource is touched
    /// - `NotFound` when nothing exists at `path`
    /// - anything `commit()` returns
    pub fn handle_acl_mutation(
        &self,
        tree: &dyn ResourceTree,
        path: &str,
        proposed: Option<Acl>,
    ) -> AclResult<CommitReceipt> {
        let Some(proposed) = proposed else {
            warn!(path = %path, "ACL request carried no body");
            return Err(AclError::BadRequest {
                reason: "ACL request has no body".to_string(),
            });
        };

        let target = normalize_href(&self.base_uri, path);
        let resource = tree.lookup(&target).ok_or_else(|| {
            warn!(path = %target, "ACL target does not exist");
            AclError::NotFound {
                path: target.clone(),
            }
        })?;

        self.commit(tree, resource.as_ref(), proposed)
    }

    /// Replace the ACL of `resource` with `proposed`.
    ///
    /// # Pipeline
    ///
    /// 1. `resource` must expose ACL capability, else `MethodNotAllowed`
    /// 2. Normalize every proposed principal href (slashes collapsed,
    ///    percent-escapes decoded, base URI stripped)
    /// 3. Resolve the privilege hierarchy for `resource`
    /// 4. Every protected entry of the stored ACL must be retained, else
    ///    `AceConflict`
    /// 5. For each proposed entry, in order:
    ///    - the privilege must exist, else `NotSupportedPrivilege`
    ///    - the privilege must be concrete, else `NoAbstract`
    ///    - the principal must resolve to a principal, else `NotRecognizedPrincipal`
    /// 6. Write the proposed list, replacing the stored one in full
    ///
    /// An empty proposal is valid and yields an empty ACL, unless the stored
    /// ACL holds protected entries.
    pub fn commit(
        &self,
        tree: &dyn ResourceTree,
        resource: &dyn Resource,
        proposed: Acl,
    ) -> AclResult<CommitReceipt> {
        let path = resource.path();

        debug!(path = %path, entries = proposed.len(), "ACL commit starting");

        // ── Step 1: Capability ───────────────────────────────────────────────
        if !resource.has_acl_capability() {
            warn!(path = %path, "resource does not support ACL changes");
            return Err(AclError::MethodNotAllowed {
                path: path.to_string(),
            });
        }

        // ── Step 2: Normalize hrefs ──────────────────────────────────────────
        //
        // The normalized list is what gets compared and stored; principals
        // are resolved from the hrefs as submitted.
        let normalized = self.normalized(&proposed);

        // ── Step 3: Privilege hierarchy ──────────────────────────────────────
        let privileges = self.privileges(resource);

        // ── Step 4: Protected-entry conflicts ────────────────────────────────
        //
        // Compared on normalized hrefs so a stored `principals/foo` and a
        // submitted `/principals/foo/` are the same principal.
        let stored = resource.acl()?;
        let current = self.normalized(&stored);
        if let Err(err) = conflict::check(&current, &normalized) {
            warn!(path = %path, error = %err, "proposed ACL drops a protected entry");
            return Err(err);
        }

        // ── Step 5: Entry validation ─────────────────────────────────────────
        let principals = PrincipalResolver::new(tree, &self.base_uri);
        for ace in &proposed {
            if let Err(err) = Self::validate_entry(&privileges, &principals, ace) {
                warn!(
                    path = %path,
                    principal = %ace.principal,
                    privilege = %ace.privilege,
                    error = %err,
                    "proposed ACE rejected"
                );
                return Err(err);
            }
        }

        // ── Step 6: Commit ───────────────────────────────────────────────────
        //
        // The only write in the pipeline.
        let dropped = conflict::dropped_as_stored(&stored, &current, &normalized);
        let entries = normalized.len();
        let protected = normalized.protected().count();

        resource.set_acl(normalized)?;

        info!(
            path = %path,
            entries,
            protected,
            dropped = dropped.len(),
            "ACL replaced"
        );

        Ok(CommitReceipt {
            path: path.to_string(),
            entries,
            protected,
            dropped,
            committed_at: Utc::now(),
        })
    }

    fn validate_entry(
        privileges: &PrivilegeHierarchy,
        principals: &PrincipalResolver<'_>,
        ace: &Ace,
    ) -> AclResult<()> {
        if !privileges.exists(&ace.privilege) {
            return Err(AclError::NotSupportedPrivilege {
                privilege: ace.privilege.clone(),
            });
        }

        if privileges.is_abstract(&ace.privilege) {
            return Err(AclError::NoAbstract {
                privilege: ace.privilege.clone(),
            });
        }

        principals.resolve(&ace.principal)?;
        Ok(())
    }

    fn normalized(&self, acl: &Acl) -> Acl {
        acl.iter()
            .map(|ace| Ace {
                principal: normalize_href(&self.base_uri, &ace.principal),
                ..ace.clone()
            })
            .collect()
    }
}

impl Default for AclEngine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
