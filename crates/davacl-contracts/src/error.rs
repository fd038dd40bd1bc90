//! Error types for the ACL mutation path.
//!
//! Every failure is a deterministic validation outcome. Nothing here is
//! retried; each variant is surfaced to the dispatcher, which maps
//! `AclError::kind()` to a transport response.

use std::fmt;

use thiserror::Error;

use crate::privilege::PrivilegeName;

/// Copyable discriminant of an `AclError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    MethodNotAllowed,
    NotFound,
    NotRecognizedPrincipal,
    NotSupportedPrivilege,
    NoAbstract,
    AceConflict,
    WriteFailed,
    Config,
}

/// Why a principal href was not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalMiss {
    /// Nothing exists at the href.
    NotFound,
    /// Something exists, but it is not a principal.
    NotAPrincipal,
    /// The href points outside the server's base URI.
    OutsideBase,
}

impl fmt::Display for PrincipalMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalMiss::NotFound => f.write_str("does not exist"),
            PrincipalMiss::NotAPrincipal => f.write_str("is not a principal"),
            PrincipalMiss::OutsideBase => f.write_str("is outside the base URI"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AclError {
    /// The proposed list could not be obtained or decoded.
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    /// The target resource does not expose ACL read/write capability.
    #[error("resource '{path}' does not support ACL changes")]
    MethodNotAllowed { path: String },

    /// The target resource does not exist.
    #[error("resource '{path}' not found")]
    NotFound { path: String },

    #[error("the specified principal ({href}) {miss}")]
    NotRecognizedPrincipal { href: String, miss: PrincipalMiss },

    #[error("the privilege you specified ({privilege}) is not recognized by this server")]
    NotSupportedPrivilege { privilege: PrivilegeName },

    #[error("the privilege you specified ({privilege}) is an abstract privilege")]
    NoAbstract { privilege: PrivilegeName },

    /// A protected entry of the stored list would be dropped or altered.
    #[error(
        "resource contains a protected {privilege} privilege for {principal}; \
         both privilege and principal must be retained with protection"
    )]
    AceConflict {
        principal: String,
        privilege: PrivilegeName,
    },

    /// Storage rejected the new list.
    #[error("ACL write to '{path}' failed: {reason}")]
    WriteFailed { path: String, reason: String },

    /// A fixture or privilege file is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl AclError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AclError::BadRequest { .. } => ErrorKind::BadRequest,
            AclError::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            AclError::NotFound { .. } => ErrorKind::NotFound,
            AclError::NotRecognizedPrincipal { .. } => ErrorKind::NotRecognizedPrincipal,
            AclError::NotSupportedPrivilege { .. } => ErrorKind::NotSupportedPrivilege,
            AclError::NoAbstract { .. } => ErrorKind::NoAbstract,
            AclError::AceConflict { .. } => ErrorKind::AceConflict,
            AclError::WriteFailed { .. } => ErrorKind::WriteFailed,
            AclError::ConfigError { .. } => ErrorKind::Config,
        }
    }
}

/// Convenience alias used throughout the davacl crates.
pub type AclResult<T> = Result<T, AclError>;
