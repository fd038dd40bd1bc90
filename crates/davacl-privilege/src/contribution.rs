//! TOML-driven privilege contribution.
//!
//! `TomlPrivilegeContribution` loads a `PrivilegeConfig` from a TOML string or
//! file and implements the `PrivilegeContribution` trait from davacl-core.
//!
//! Collection algorithm:
//!
//! 1. Read the resource's types once.
//! 2. Walk rules in declaration order and keep those whose `resource_type`
//!    is `"*"` or one of the resource's types.
//! 3. Convert each kept rule into a `Privilege`. The engine merges them over
//!    the baseline by name.

use std::path::Path;

use tracing::{debug, warn};

use davacl_contracts::{
    error::{AclError, AclResult},
    privilege::{Privilege, PrivilegeName},
};
use davacl_core::{hierarchy, traits::PrivilegeContribution, Resource};

use crate::rule::PrivilegeConfig;

/// A `PrivilegeContribution` that reads declarations from a TOML document.
///
/// ```rust,ignore
/// use davacl_privilege::TomlPrivilegeContribution;
///
/// let caldav = TomlPrivilegeContribution::from_file(Path::new("privileges/caldav.toml"))?;
/// let engine = AclEngine::new(vec![Box::new(caldav)]);
/// ```
#[derive(Debug, Clone)]
pub struct TomlPrivilegeContribution {
    config: PrivilegeConfig,
}

impl TomlPrivilegeContribution {
    pub fn new(config: PrivilegeConfig) -> Self {
        warn_on_dangling_aggregates(&config);
        Self { config }
    }

    /// Parse `s` as TOML and build a `TomlPrivilegeContribution`.
    ///
    /// Returns `AclError::ConfigError` if the TOML is malformed, or if it does
    /// not match the `PrivilegeConfig` schema (including bad privilege names).
    pub fn from_toml_str(s: &str) -> AclResult<Self> {
        let config: PrivilegeConfig = toml::from_str(s).map_err(|e| AclError::ConfigError {
            reason: format!("failed to parse privilege TOML: {}", e),
        })?;
        Ok(Self::new(config))
    }

    /// Read the file at `path` and parse it as TOML privilege configuration.
    pub fn from_file(path: &Path) -> AclResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AclError::ConfigError {
            reason: format!("failed to read privilege file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn config(&self) -> &PrivilegeConfig {
        &self.config
    }
}

impl PrivilegeContribution for TomlPrivilegeContribution {
    fn collect(&self, resource: &dyn Resource) -> Vec<Privilege> {
        let resource_types = resource.resource_types();

        let privileges: Vec<Privilege> = self
            .config
            .privileges
            .iter()
            .filter(|rule| rule.matches(&resource_types))
            .map(|rule| rule.to_privilege())
            .collect();

        debug!(
            path = %resource.path(),
            declared = self.config.privileges.len(),
            contributed = privileges.len(),
            "collected configured privileges"
        );

        privileges
    }
}

/// Warn about aggregates that name neither a baseline privilege nor another
/// configured one. They are kept; they just never resolve to anything.
fn warn_on_dangling_aggregates(config: &PrivilegeConfig) {
    let baseline = hierarchy::baseline();
    let declared = |name: &PrivilegeName| {
        baseline.exists(name) || config.privileges.iter().any(|rule| rule.name == *name)
    };

    for rule in &config.privileges {
        for aggregate in rule.aggregates.iter().filter(|a| !declared(*a)) {
            warn!(
                privilege = %rule.name,
                aggregate = %aggregate,
                "configured privilege aggregates an undeclared privilege"
            );
        }
    }
}
