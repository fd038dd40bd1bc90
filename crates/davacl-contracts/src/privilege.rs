//! Privilege names, privilege records, and the resolved per-resource hierarchy.
//!
//! Privileges are flat records: an `abstract` flag plus the set of privilege
//! names they aggregate. Aggregation is a set of names, not inheritance, so a
//! `PrivilegeHierarchy` is simply a map keyed by name with derived queries on
//! top.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AclError;

/// The namespace of every built-in WebDAV privilege.
pub const DAV_NAMESPACE: &str = "DAV:";

/// Local names of the built-in `DAV:` privileges.
pub mod dav {
    pub const ALL: &str = "all";
    pub const READ: &str = "read";
    pub const WRITE: &str = "write";
    pub const READ_ACL: &str = "read-acl";
    pub const READ_CURRENT_USER_PRIVILEGE_SET: &str = "read-current-user-privilege-set";
    pub const WRITE_PROPERTIES: &str = "write-properties";
    pub const WRITE_CONTENT: &str = "write-content";
    pub const WRITE_ACL: &str = "write-acl";
    pub const BIND: &str = "bind";
    pub const UNBIND: &str = "unbind";
    pub const UNLOCK: &str = "unlock";
}

/// A namespaced privilege name, written in Clark notation: `{namespace}local`.
///
/// A name without a `{namespace}` prefix has an empty namespace. Such names
/// never match a built-in privilege, so they only resolve if a contribution
/// declares them that way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrivilegeName {
    namespace: String,
    local: String,
}

impl PrivilegeName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A privilege in the `DAV:` namespace.
    pub fn dav(local: impl Into<String>) -> Self {
        Self::new(DAV_NAMESPACE, local)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for PrivilegeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

impl FromStr for PrivilegeName {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (namespace, local) = match s.strip_prefix('{') {
            Some(rest) => rest.split_once('}').ok_or_else(|| AclError::BadRequest {
                reason: format!("privilege name '{}' has an unterminated namespace", s),
            })?,
            None => ("", s),
        };

        if local.is_empty() {
            return Err(AclError::BadRequest {
                reason: format!("privilege name '{}' has no local part", s),
            });
        }

        Ok(Self::new(namespace, local))
    }
}

impl TryFrom<String> for PrivilegeName {
    type Error = AclError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PrivilegeName> for String {
    fn from(name: PrivilegeName) -> Self {
        name.to_string()
    }
}

/// One entry of the supported-privilege vocabulary of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    pub name: PrivilegeName,

    /// Abstract privileges exist only to aggregate others; they may never be
    /// the direct subject of a grant.
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,

    /// Privileges this one structurally contains.
    #[serde(default)]
    pub aggregates: BTreeSet<PrivilegeName>,
}

impl Privilege {
    /// A concrete privilege that aggregates nothing.
    pub fn new(name: PrivilegeName) -> Self {
        Self {
            name,
            is_abstract: false,
            aggregates: BTreeSet::new(),
        }
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn aggregating(mut self, names: impl IntoIterator<Item = PrivilegeName>) -> Self {
        self.aggregates.extend(names);
        self
    }
}

/// The privilege vocabulary resolved for one resource.
///
/// Built fresh for every ACL operation and discarded afterwards. Declaring a
/// name that is already present replaces the earlier record wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeHierarchy {
    privileges: BTreeMap<PrivilegeName, Privilege>,
}

impl PrivilegeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a privilege. Last write wins per name.
    pub fn declare(&mut self, privilege: Privilege) {
        self.privileges.insert(privilege.name.clone(), privilege);
    }

    pub fn get(&self, name: &PrivilegeName) -> Option<&Privilege> {
        self.privileges.get(name)
    }

    pub fn exists(&self, name: &PrivilegeName) -> bool {
        self.privileges.contains_key(name)
    }

    /// True only for privileges that are present and flagged abstract.
    pub fn is_abstract(&self, name: &PrivilegeName) -> bool {
        self.privileges.get(name).is_some_and(|p| p.is_abstract)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Privilege> {
        self.privileges.values()
    }

    pub fn len(&self) -> usize {
        self.privileges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.privileges.is_empty()
    }

    /// Privileges that no other declared privilege aggregates.
    pub fn roots(&self) -> Vec<&PrivilegeName> {
        let aggregated: BTreeSet<&PrivilegeName> = self
            .privileges
            .values()
            .flat_map(|p| p.aggregates.iter())
            .collect();

        self.privileges
            .keys()
            .filter(|name| !aggregated.contains(name))
            .collect()
    }

    /// The privilege itself plus everything it aggregates, transitively.
    ///
    /// Aggregated names that were never declared are still included; they
    /// simply contribute nothing further. Cycles terminate. Returns an empty
    /// set for an unknown privilege.
    pub fn closure(&self, name: &PrivilegeName) -> BTreeSet<PrivilegeName> {
        let mut seen = BTreeSet::new();
        if !self.exists(name) {
            return seen;
        }

        let mut stack = vec![name.clone()];
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(privilege) = self.privileges.get(&next) {
                stack.extend(privilege.aggregates.iter().cloned());
            }
        }
        seen
    }

    /// The concrete privilege that stands in for `name` when it is granted.
    ///
    /// A concrete privilege is its own answer. An abstract one defers to the
    /// nearest concrete privilege that aggregates it, and `None` means no
    /// concrete ancestor exists.
    pub fn concrete(&self, name: &PrivilegeName) -> Option<&PrivilegeName> {
        let mut visited = BTreeSet::new();
        self.concrete_inner(name, &mut visited)
    }

    fn concrete_inner<'a>(
        &'a self,
        name: &PrivilegeName,
        visited: &mut BTreeSet<PrivilegeName>,
    ) -> Option<&'a PrivilegeName> {
        let (key, privilege) = self.privileges.get_key_value(name)?;
        if !privilege.is_abstract {
            return Some(key);
        }
        if !visited.insert(key.clone()) {
            return None;
        }

        self.privileges
            .values()
            .filter(|parent| parent.aggregates.contains(name))
            .find_map(|parent| self.concrete_inner(&parent.name, visited))
    }
}

impl FromIterator<Privilege> for PrivilegeHierarchy {
    fn from_iter<I: IntoIterator<Item = Privilege>>(iter: I) -> Self {
        let mut hierarchy = Self::new();
        for privilege in iter {
            hierarchy.declare(privilege);
        }
        hierarchy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PrivilegeHierarchy {
        [
            Privilege::new(PrivilegeName::dav("all"))
                .with_abstract(true)
                .aggregating([PrivilegeName::dav("read"), PrivilegeName::dav("write")]),
            Privilege::new(PrivilegeName::dav("read"))
                .aggregating([PrivilegeName::dav("read-acl")]),
            Privilege::new(PrivilegeName::dav("read-acl")),
            Privilege::new(PrivilegeName::dav("write"))
                .aggregating([PrivilegeName::dav("bind"), PrivilegeName::dav("secret")]),
            Privilege::new(PrivilegeName::dav("bind")),
            Privilege::new(PrivilegeName::dav("secret")).with_abstract(true),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn clark_notation_parses_and_prints() {
        let name: PrivilegeName = "{DAV:}write-acl".parse().unwrap();
        assert_eq!(name.namespace(), "DAV:");
        assert_eq!(name.local(), "write-acl");
        assert_eq!(name.to_string(), "{DAV:}write-acl");
        assert_eq!(name, PrivilegeName::dav("write-acl"));
    }

    #[test]
    fn bare_name_has_empty_namespace() {
        let name: PrivilegeName = "bananas".parse().unwrap();
        assert_eq!(name.namespace(), "");
        assert_eq!(name.to_string(), "bananas");
        assert_ne!(name, PrivilegeName::dav("bananas"));
    }

    #[test]
    fn malformed_names_are_rejected() {
        assert!("{DAV:read".parse::<PrivilegeName>().is_err());
        assert!("{DAV:}".parse::<PrivilegeName>().is_err());
        assert!("".parse::<PrivilegeName>().is_err());
    }

    #[test]
    fn declare_replaces_by_name() {
        let mut hierarchy = sample();
        assert!(!hierarchy.is_abstract(&PrivilegeName::dav("read")));

        hierarchy.declare(Privilege::new(PrivilegeName::dav("read")).with_abstract(true));

        assert!(hierarchy.is_abstract(&PrivilegeName::dav("read")));
        assert!(hierarchy.get(&PrivilegeName::dav("read")).unwrap().aggregates.is_empty());
    }

    #[test]
    fn unknown_privilege_is_not_abstract() {
        let hierarchy = sample();
        assert!(!hierarchy.exists(&PrivilegeName::dav("bananas")));
        assert!(!hierarchy.is_abstract(&PrivilegeName::dav("bananas")));
    }

    #[test]
    fn roots_are_unaggregated_privileges() {
        let hierarchy = sample();
        assert_eq!(hierarchy.roots(), vec![&PrivilegeName::dav("all")]);
    }

    #[test]
    fn closure_walks_aggregates_transitively() {
        let hierarchy = sample();
        let closure = hierarchy.closure(&PrivilegeName::dav("all"));

        for local in ["all", "read", "read-acl", "write", "bind", "secret"] {
            assert!(closure.contains(&PrivilegeName::dav(local)), "missing {local}");
        }
        assert!(hierarchy.closure(&PrivilegeName::dav("bananas")).is_empty());
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let hierarchy: PrivilegeHierarchy = [
            Privilege::new(PrivilegeName::dav("a")).aggregating([PrivilegeName::dav("b")]),
            Privilege::new(PrivilegeName::dav("b")).aggregating([PrivilegeName::dav("a")]),
        ]
        .into_iter()
        .collect();

        assert_eq!(hierarchy.closure(&PrivilegeName::dav("a")).len(), 2);
    }

    #[test]
    fn concrete_resolves_to_nearest_concrete_ancestor() {
        let hierarchy = sample();

        assert_eq!(
            hierarchy.concrete(&PrivilegeName::dav("bind")),
            Some(&PrivilegeName::dav("bind"))
        );
        assert_eq!(
            hierarchy.concrete(&PrivilegeName::dav("secret")),
            Some(&PrivilegeName::dav("write"))
        );
        // The abstract root has nothing concrete above it.
        assert_eq!(hierarchy.concrete(&PrivilegeName::dav("all")), None);
        assert_eq!(hierarchy.concrete(&PrivilegeName::dav("bananas")), None);
    }
}
