//! Protected-entry conflict detection.
//!
//! A replace is allowed to drop or rewrite any unprotected entry. Every
//! protected entry of the stored list must reappear in the proposed list with
//! the same principal and privilege and still flagged protected. This is a
//! set difference keyed by `(principal, privilege)`, not a list merge.

use std::collections::HashSet;

use davacl_contracts::{
    ace::{Ace, Acl},
    error::{AclError, AclResult},
    privilege::PrivilegeName,
};

/// The first protected entry of `current` (in list order) that `proposed`
/// does not retain, if any.
pub fn find_conflict<'a>(current: &'a Acl, proposed: &Acl) -> Option<&'a Ace> {
    let retained: HashSet<(&str, &PrivilegeName)> =
        proposed.protected().map(Ace::key).collect();

    current.protected().find(|ace| !retained.contains(&ace.key()))
}

/// Fail with `AceConflict` naming the first protected entry `proposed` drops.
pub fn check(current: &Acl, proposed: &Acl) -> AclResult<()> {
    match find_conflict(current, proposed) {
        Some(ace) => Err(AclError::AceConflict {
            principal: ace.principal.clone(),
            privilege: ace.privilege.clone(),
        }),
        None => Ok(()),
    }
}

/// Entries of `current` whose `(principal, privilege)` pair is absent from
/// `proposed`.
pub fn dropped(current: &Acl, proposed: &Acl) -> Vec<Ace> {
    dropped_as_stored(current, current, proposed)
}

/// Like `dropped`, but reports each entry of `stored` as written.
///
/// `current` is `stored` with normalized hrefs, entry for entry; the
/// comparison with `proposed` runs on `current`.
pub fn dropped_as_stored(stored: &Acl, current: &Acl, proposed: &Acl) -> Vec<Ace> {
    let kept: HashSet<(&str, &PrivilegeName)> = proposed.iter().map(Ace::key).collect();

    stored
        .iter()
        .zip(current.iter())
        .filter(|(_, normalized)| !kept.contains(&normalized.key()))
        .map(|(raw, _)| raw.clone())
        .collect()
}
