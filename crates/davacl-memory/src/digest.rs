//! ACL digests: a compact commitment to the exact stored list.
//!
//! Two ACLs have the same digest only if they hold the same entries in the
//! same order, so comparing digests before and after a rejected request
//! shows the stored list was left untouched.
//!
//! Hash input layout (bytes, in order):
//!   1. entry count as 8-byte little-endian
//!   2. per entry:
//!      a. principal length (8-byte LE) and UTF-8 bytes
//!      b. privilege Clark name length (8-byte LE) and UTF-8 bytes
//!      c. protected flag as one byte (0 or 1)

use sha2::{Digest, Sha256};

use davacl_contracts::ace::Acl;

/// Compute the SHA-256 digest of `acl`.
///
/// Returns a lowercase 64-character hex string.
pub fn acl_digest(acl: &Acl) -> String {
    let mut hasher = Sha256::new();
    hasher.update((acl.len() as u64).to_le_bytes());

    for ace in acl {
        let privilege = ace.privilege.to_string();

        hasher.update((ace.principal.len() as u64).to_le_bytes());
        hasher.update(ace.principal.as_bytes());
        hasher.update((privilege.len() as u64).to_le_bytes());
        hasher.update(privilege.as_bytes());
        hasher.update([u8::from(ace.protected)]);
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use davacl_contracts::{ace::Ace, privilege::PrivilegeName};

    use super::*;

    fn ace(principal: &str, protected: bool) -> Ace {
        Ace {
            principal: principal.to_string(),
            privilege: PrivilegeName::dav("write"),
            protected,
        }
    }

    #[test]
    fn digest_is_stable_hex() {
        let acl = Acl::new(vec![ace("principals/foo", true)]);
        let digest = acl_digest(&acl);

        assert_eq!(digest.len(), 64);
        assert_eq!(digest, acl_digest(&acl.clone()));
    }

    #[test]
    fn digest_sees_every_field_and_order() {
        let base = acl_digest(&Acl::new(vec![ace("a", true), ace("b", false)]));

        assert_ne!(base, acl_digest(&Acl::new(vec![ace("b", false), ace("a", true)])));
        assert_ne!(base, acl_digest(&Acl::new(vec![ace("a", false), ace("b", false)])));
        assert_ne!(base, acl_digest(&Acl::new(vec![ace("a", true)])));
        // Length prefixes keep field boundaries unambiguous.
        assert_ne!(
            acl_digest(&Acl::new(vec![ace("ab", true)])),
            acl_digest(&Acl::new(vec![ace("a", true), ace("b", true)]))
        );
    }

    #[test]
    fn empty_acl_has_a_digest() {
        assert_eq!(acl_digest(&Acl::default()).len(), 64);
    }
}
