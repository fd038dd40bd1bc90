//! # davacl-privilege
//!
//! TOML-configured privilege vocabulary for the DAV ACL engine.
//!
//! ## Overview
//!
//! This crate provides [`TomlPrivilegeContribution`], which implements the
//! [`PrivilegeContribution`](davacl_core::traits::PrivilegeContribution)
//! trait. Privileges are declared in a TOML file, optionally scoped to one
//! resource type, and merged over the built-in `DAV:` baseline whenever a
//! hierarchy is resolved.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use davacl_privilege::TomlPrivilegeContribution;
//!
//! let extra = TomlPrivilegeContribution::from_file(Path::new("privileges.toml"))?;
//! let engine = davacl_core::AclEngine::new(vec![Box::new(extra)]);
//! ```

pub mod contribution;
pub mod rule;

pub use contribution::TomlPrivilegeContribution;
pub use rule::{PrivilegeConfig, PrivilegeRule, ANY_RESOURCE_TYPE};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use davacl_contracts::{error::AclError, privilege::PrivilegeName};
    use davacl_core::{hierarchy, traits::PrivilegeContribution, Resource};

    use crate::TomlPrivilegeContribution;

    // ── Helpers ───────────────────────────────────────────────────────────────

    struct Node {
        types: Vec<String>,
    }

    impl Resource for Node {
        fn path(&self) -> &str {
            "calendars/work"
        }

        fn resource_types(&self) -> Vec<String> {
            self.types.clone()
        }
    }

    fn calendar() -> Node {
        Node {
            types: vec![
                "{DAV:}collection".to_string(),
                "{urn:ietf:params:xml:ns:caldav}calendar".to_string(),
            ],
        }
    }

    fn plain() -> Node {
        Node { types: vec![] }
    }

    const CALDAV: &str = r#"
        [[privileges]]
        name = "{urn:ietf:params:xml:ns:caldav}read-free-busy"
        resource_type = "{urn:ietf:params:xml:ns:caldav}calendar"
        description = "Query free/busy time"

        [[privileges]]
        name = "{urn:example}moderate"
        abstract = true
        aggregates = ["{DAV:}write-content", "{DAV:}unbind"]
    "#;

    // ── 1. empty config ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_config_contributes_nothing() {
        let contribution = TomlPrivilegeContribution::from_toml_str("").unwrap();
        assert!(contribution.collect(&calendar()).is_empty());
    }

    // ── 2. wildcard rules ─────────────────────────────────────────────────────

    #[test]
    fn test_wildcard_rule_applies_everywhere() {
        let contribution = TomlPrivilegeContribution::from_toml_str(CALDAV).unwrap();

        let privileges = contribution.collect(&plain());

        assert_eq!(privileges.len(), 1);
        assert_eq!(privileges[0].name, PrivilegeName::new("urn:example", "moderate"));
        assert!(privileges[0].is_abstract);
        assert!(privileges[0]
            .aggregates
            .contains(&PrivilegeName::dav("write-content")));
    }

    // ── 3. resource-type scoping ──────────────────────────────────────────────

    #[test]
    fn test_scoped_rule_needs_matching_resource_type() {
        let contribution = TomlPrivilegeContribution::from_toml_str(CALDAV).unwrap();
        let freebusy = PrivilegeName::new("urn:ietf:params:xml:ns:caldav", "read-free-busy");

        let on_calendar = contribution.collect(&calendar());
        assert!(on_calendar.iter().any(|p| p.name == freebusy));

        let on_plain = contribution.collect(&plain());
        assert!(!on_plain.iter().any(|p| p.name == freebusy));
    }

    // ── 4. overriding the baseline ────────────────────────────────────────────

    #[test]
    fn test_rule_can_mark_baseline_privilege_abstract() {
        let contribution = TomlPrivilegeContribution::from_toml_str(
            r#"
            [[privileges]]
            name = "{DAV:}unlock"
            abstract = true
        "#,
        )
        .unwrap();

        let contributions: Vec<Box<dyn PrivilegeContribution>> = vec![Box::new(contribution)];
        let resolved = hierarchy::resolve(&plain(), &contributions);

        assert!(resolved.is_abstract(&PrivilegeName::dav("unlock")));
        assert!(!resolved.is_abstract(&PrivilegeName::dav("write")));
    }

    // ── 5. declaration order ──────────────────────────────────────────────────

    #[test]
    fn test_later_declaration_wins() {
        let contribution = TomlPrivilegeContribution::from_toml_str(
            r#"
            [[privileges]]
            name = "{urn:example}publish"
            abstract = true

            [[privileges]]
            name = "{urn:example}publish"
        "#,
        )
        .unwrap();

        let contributions: Vec<Box<dyn PrivilegeContribution>> = vec![Box::new(contribution)];
        let resolved = hierarchy::resolve(&plain(), &contributions);

        let publish = PrivilegeName::new("urn:example", "publish");
        assert!(resolved.exists(&publish));
        assert!(!resolved.is_abstract(&publish));
    }

    // ── 6. unrelated tables are ignored ───────────────────────────────────────

    #[test]
    fn test_fixture_tables_are_ignored() {
        let contribution = TomlPrivilegeContribution::from_toml_str(
            r#"
            base_uri = "/dav/"

            [[nodes]]
            path = "test"
            kind = "acl"
        "#,
        )
        .unwrap();

        assert!(contribution.config().privileges.is_empty());
    }

    // ── 7. parse errors ───────────────────────────────────────────────────────

    #[test]
    fn test_toml_parse_error() {
        let result = TomlPrivilegeContribution::from_toml_str("this is not valid toml ][[[");

        match result {
            Err(AclError::ConfigError { reason }) => {
                assert!(
                    reason.contains("failed to parse privilege TOML"),
                    "expected parse error message, got: {reason}"
                );
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_privilege_name_is_config_error() {
        let result = TomlPrivilegeContribution::from_toml_str(
            r#"
            [[privileges]]
            name = "{urn:example"
        "#,
        );

        assert!(matches!(result, Err(AclError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = std::path::Path::new("/nonexistent/privileges.toml");
        let result = TomlPrivilegeContribution::from_file(path);
        assert!(matches!(result, Err(AclError::ConfigError { .. })));
    }
}
