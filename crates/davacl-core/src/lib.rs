//! # davacl-core
//!
//! The validation-and-commit engine behind the WebDAV `ACL` method.
//!
//! This crate provides:
//! - The collaborator traits (`Resource`, `ResourceTree`, `PrivilegeContribution`)
//! - Per-resource privilege hierarchy resolution (`hierarchy`)
//! - Principal href resolution (`principal`)
//! - Protected-entry conflict detection (`conflict`)
//! - The `AclEngine` that wires them together in the correct order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use davacl_core::AclEngine;
//!
//! let engine = AclEngine::new(contributions).with_base_uri("/dav/");
//! let receipt = engine.handle_acl_mutation(&tree, "/dav/calendars/work", Some(acl))?;
//! ```

pub mod conflict;
pub mod engine;
pub mod hierarchy;
pub mod principal;
pub mod traits;

pub use engine::AclEngine;
pub use principal::{normalize_href, relative_href, PrincipalResolver};
pub use traits::{PrivilegeContribution, Resource, ResourceTree};
