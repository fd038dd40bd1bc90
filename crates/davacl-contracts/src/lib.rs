//! # davacl-contracts
//!
//! Shared types for the DAV access-control engine.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate: only privilege and ACE data definitions, the resolved
//! privilege map, and the error types.

pub mod ace;
pub mod error;
pub mod privilege;
pub mod receipt;

pub use ace::{decode_acl_body, Ace, Acl};
pub use error::{AclError, AclResult, ErrorKind, PrincipalMiss};
pub use privilege::{Privilege, PrivilegeHierarchy, PrivilegeName, DAV_NAMESPACE};
pub use receipt::CommitReceipt;

#[cfg(test)]
mod tests {
    use super::*;

    fn write() -> PrivilegeName {
        PrivilegeName::dav("write")
    }

    // ── Ace / Acl ────────────────────────────────────────────────────────────

    #[test]
    fn ace_constructors_set_protection() {
        assert!(!Ace::new("principals/foo", write()).protected);
        assert!(Ace::protected("principals/foo", write()).protected);
    }

    #[test]
    fn acl_protected_keeps_list_order() {
        let acl = Acl::new(vec![
            Ace::protected("principals/a", write()),
            Ace::new("principals/b", write()),
            Ace::protected("principals/c", write()),
        ]);

        let principals: Vec<&str> = acl.protected().map(|a| a.principal.as_str()).collect();
        assert_eq!(principals, vec!["principals/a", "principals/c"]);
    }

    // ── Body decoding ────────────────────────────────────────────────────────

    #[test]
    fn decode_body_reads_entries() {
        let body = r#"[
            { "principal": "/principals/foo", "privilege": "{DAV:}write", "protected": true },
            { "principal": "/principals/baz", "privilege": "{DAV:}read" }
        ]"#;

        let acl = decode_acl_body(Some(body)).unwrap();

        assert_eq!(acl.len(), 2);
        assert_eq!(acl.entries()[0], Ace::protected("/principals/foo", write()));
        assert_eq!(
            acl.entries()[1],
            Ace::new("/principals/baz", PrivilegeName::dav("read"))
        );
    }

    #[test]
    fn decode_empty_array_is_an_empty_acl() {
        let acl = decode_acl_body(Some("[]")).unwrap();
        assert!(acl.is_empty());
    }

    #[test]
    fn decode_missing_body_is_bad_request() {
        for body in [None, Some(""), Some("   \n")] {
            let err = decode_acl_body(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
        }
    }

    #[test]
    fn decode_garbage_is_bad_request() {
        let err = decode_acl_body(Some("<d:acl xmlns:d=\"DAV:\"/>")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = decode_acl_body(Some(r#"[{ "principal": "p", "privilege": "{DAV:" }]"#))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn acl_serializes_as_plain_array() {
        let acl = Acl::new(vec![Ace::protected("principals/foo", write())]);
        let json = serde_json::to_value(&acl).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                { "principal": "principals/foo", "privilege": "{DAV:}write", "protected": true }
            ])
        );
    }

    // ── AclError display messages ────────────────────────────────────────────

    #[test]
    fn error_not_recognized_principal_display() {
        let err = AclError::NotRecognizedPrincipal {
            href: "principals/notfound".to_string(),
            miss: PrincipalMiss::NotFound,
        };
        let msg = err.to_string();
        assert!(msg.contains("principals/notfound"));
        assert!(msg.contains("does not exist"));
        assert_eq!(err.kind(), ErrorKind::NotRecognizedPrincipal);

        let err = AclError::NotRecognizedPrincipal {
            href: "principals/notaprincipal".to_string(),
            miss: PrincipalMiss::NotAPrincipal,
        };
        assert!(err.to_string().contains("is not a principal"));

        let err = AclError::NotRecognizedPrincipal {
            href: "/elsewhere/principals/foo".to_string(),
            miss: PrincipalMiss::OutsideBase,
        };
        assert!(err.to_string().contains("outside the base URI"));
    }

    #[test]
    fn error_ace_conflict_display() {
        let err = AclError::AceConflict {
            principal: "principals/foo".to_string(),
            privilege: write(),
        };
        let msg = err.to_string();
        assert!(msg.contains("principals/foo"));
        assert!(msg.contains("{DAV:}write"));
        assert!(msg.contains("protected"));
    }

    #[test]
    fn error_privilege_display() {
        let err = AclError::NotSupportedPrivilege {
            privilege: PrivilegeName::dav("bananas"),
        };
        assert!(err.to_string().contains("{DAV:}bananas"));

        let err = AclError::NoAbstract {
            privilege: PrivilegeName::dav("all"),
        };
        assert!(err.to_string().contains("abstract"));
        assert_eq!(err.kind(), ErrorKind::NoAbstract);
    }
}
