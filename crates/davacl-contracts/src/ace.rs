//! Access control entries and the authorization list a resource owns.
//!
//! An `Acl` is replaced wholesale on every successful commit and never
//! partially mutated. The engine never caches one across requests.

use serde::{Deserialize, Serialize};

use crate::{
    error::{AclError, AclResult},
    privilege::PrivilegeName,
};

/// One grant: `principal` holds `privilege` on the owning resource.
///
/// `protected` is only trusted when it comes from the stored list. A client
/// may submit a protected entry, but that grants no exemption on its own;
/// protection is checked against what the resource already stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ace {
    /// Href of the principal resource, e.g. `principals/admin`.
    pub principal: String,
    pub privilege: PrivilegeName,
    #[serde(default)]
    pub protected: bool,
}

impl Ace {
    /// An unprotected grant.
    pub fn new(principal: impl Into<String>, privilege: PrivilegeName) -> Self {
        Self {
            principal: principal.into(),
            privilege,
            protected: false,
        }
    }

    /// A protected grant.
    pub fn protected(principal: impl Into<String>, privilege: PrivilegeName) -> Self {
        Self {
            protected: true,
            ..Self::new(principal, privilege)
        }
    }

    /// The `(principal, privilege)` pair an entry is identified by.
    pub fn key(&self) -> (&str, &PrivilegeName) {
        (self.principal.as_str(), &self.privilege)
    }
}

/// The ordered authorization list of exactly one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acl {
    entries: Vec<Ace>,
}

impl Acl {
    pub fn new(entries: Vec<Ace>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Ace] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ace> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, ace: &Ace) -> bool {
        self.entries.contains(ace)
    }

    /// Entries flagged protected, in list order.
    pub fn protected(&self) -> impl Iterator<Item = &Ace> {
        self.entries.iter().filter(|ace| ace.protected)
    }

    pub fn into_entries(self) -> Vec<Ace> {
        self.entries
    }
}

impl From<Vec<Ace>> for Acl {
    fn from(entries: Vec<Ace>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<Ace> for Acl {
    fn from_iter<I: IntoIterator<Item = Ace>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Acl {
    type Item = &'a Ace;
    type IntoIter = std::slice::Iter<'a, Ace>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Decode a JSON request body into a proposed `Acl`.
///
/// The body is an array of `{ "principal", "privilege", "protected" }`
/// objects. A missing or blank body, or one that does not decode, is a
/// `BadRequest`.
pub fn decode_acl_body(body: Option<&str>) -> AclResult<Acl> {
    let body = match body.map(str::trim) {
        Some(b) if !b.is_empty() => b,
        _ => {
            return Err(AclError::BadRequest {
                reason: "ACL request has no body".to_string(),
            })
        }
    };

    serde_json::from_str(body).map_err(|e| AclError::BadRequest {
        reason: format!("failed to parse ACL request body: {}", e),
    })
}
