//! Per-resource privilege hierarchy resolution.
//!
//! The hierarchy is never cached globally: different resource types expose
//! different vocabularies, so it is rebuilt for every ACL operation from the
//! built-in baseline plus whatever the registered contributions add.

use tracing::debug;

use davacl_contracts::privilege::{dav, Privilege, PrivilegeHierarchy, PrivilegeName};

use crate::traits::{PrivilegeContribution, Resource};

/// The built-in `DAV:` privileges every ACL-capable resource supports.
///
/// ```text
/// all (abstract)
/// ├── read
/// │   ├── read-acl
/// │   └── read-current-user-privilege-set
/// └── write
///     ├── write-properties
///     ├── write-content
///     ├── bind
///     ├── unbind
///     └── write-acl
/// unlock
/// ```
pub fn baseline() -> PrivilegeHierarchy {
    let d = PrivilegeName::dav;

    let mut hierarchy: PrivilegeHierarchy = [
        dav::READ_ACL,
        dav::READ_CURRENT_USER_PRIVILEGE_SET,
        dav::WRITE_PROPERTIES,
        dav::WRITE_CONTENT,
        dav::WRITE_ACL,
        dav::BIND,
        dav::UNBIND,
        dav::UNLOCK,
    ]
    .into_iter()
    .map(|local| Privilege::new(d(local)))
    .collect();

    hierarchy.declare(
        Privilege::new(d(dav::ALL))
            .with_abstract(true)
            .aggregating([d(dav::READ), d(dav::WRITE)]),
    );
    hierarchy.declare(
        Privilege::new(d(dav::READ))
            .aggregating([d(dav::READ_ACL), d(dav::READ_CURRENT_USER_PRIVILEGE_SET)]),
    );
    hierarchy.declare(Privilege::new(d(dav::WRITE)).aggregating([
        d(dav::WRITE_PROPERTIES),
        d(dav::WRITE_CONTENT),
        d(dav::BIND),
        d(dav::UNBIND),
        d(dav::WRITE_ACL),
    ]));

    hierarchy
}

/// Resolve the privilege hierarchy for `resource`.
///
/// Seeds the map with `baseline()`, then asks every contribution in order.
/// A contributed privilege replaces any earlier record with the same name.
pub fn resolve(
    resource: &dyn Resource,
    contributions: &[Box<dyn PrivilegeContribution>],
) -> PrivilegeHierarchy {
    let mut hierarchy = baseline();

    for contribution in contributions {
        for privilege in contribution.collect(resource) {
            debug!(
                path = %resource.path(),
                privilege = %privilege.name,
                is_abstract = privilege.is_abstract,
                "merging contributed privilege"
            );
            hierarchy.declare(privilege);
        }
    }

    debug!(
        path = %resource.path(),
        privileges = hierarchy.len(),
        contributions = contributions.len(),
        "privilege hierarchy resolved"
    );

    hierarchy
}
