//! Privilege declaration types and configuration schema.
//!
//! A `PrivilegeConfig` is deserialized from TOML and holds an ordered list of
//! `PrivilegeRule`s. Each rule declares one privilege and the resource type it
//! applies to. Rules are contributed in declaration order, so a later rule
//! for the same name replaces an earlier one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use davacl_contracts::privilege::{Privilege, PrivilegeName};

/// Wildcard resource type: the rule applies to every resource.
pub const ANY_RESOURCE_TYPE: &str = "*";

fn any_resource_type() -> String {
    ANY_RESOURCE_TYPE.to_string()
}

/// A single privilege declaration loaded from TOML.
///
/// Example in TOML:
/// ```toml
/// [[privileges]]
/// name = "{urn:ietf:params:xml:ns:caldav}read-free-busy"
/// resource_type = "{urn:ietf:params:xml:ns:caldav}calendar"
/// description = "Query free/busy time without reading events"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeRule {
    /// Clark-notation privilege name.
    pub name: PrivilegeName,

    /// Abstract privileges can only be implied through aggregation.
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,

    /// Names this privilege aggregates.
    #[serde(default)]
    pub aggregates: Vec<PrivilegeName>,

    /// Resource type (Clark notation) this declaration is scoped to.
    /// Defaults to `"*"`, which matches every resource.
    #[serde(default = "any_resource_type")]
    pub resource_type: String,

    /// Human-readable explanation, shown by the demo CLI.
    #[serde(default)]
    pub description: Option<String>,
}

impl PrivilegeRule {
    /// Return true if this rule applies to a resource with `resource_types`.
    ///
    /// - `"*"` matches any resource, including one with no types.
    /// - Otherwise one of the resource's types must match exactly.
    pub fn matches(&self, resource_types: &[String]) -> bool {
        self.resource_type == ANY_RESOURCE_TYPE
            || resource_types.iter().any(|t| *t == self.resource_type)
    }

    pub fn to_privilege(&self) -> Privilege {
        Privilege {
            name: self.name.clone(),
            is_abstract: self.is_abstract,
            aggregates: self.aggregates.iter().cloned().collect::<BTreeSet<_>>(),
        }
    }
}

/// The top-level structure deserialized from a privilege TOML file.
///
/// Unknown top-level tables are ignored, so privileges can live in the same
/// file as a tree fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivilegeConfig {
    /// Ordered declarations. Later entries win per name.
    #[serde(default)]
    pub privileges: Vec<PrivilegeRule>,
}
