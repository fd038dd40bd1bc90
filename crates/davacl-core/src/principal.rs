//! Principal href resolution.
//!
//! An href is interpreted as a path into the resource tree. Every failure
//! (outside the base URI, nothing there, or something there that is not a
//! principal) is reported through the same `NotRecognizedPrincipal` kind
//! with a distinct `PrincipalMiss`.

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use tracing::debug;

use davacl_contracts::error::{AclError, AclResult, PrincipalMiss};

use crate::traits::{Resource, ResourceTree};

/// Path part of `href`: scheme and authority dropped, runs of `/`
/// collapsed, percent-escapes decoded.
fn canonical_path(href: &str) -> String {
    let mut raw = href.trim();

    if let Some((_, rest)) = raw.split_once("://") {
        raw = rest.find('/').map_or("/", |idx| &rest[idx..]);
    }

    let mut collapsed = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }

    percent_decode_str(&collapsed).decode_utf8_lossy().into_owned()
}

/// Server-relative tree path for `href`.
///
/// Returns `None` when `href` is absolute (a URL or a path starting with
/// `/`) but lies outside `base_uri`. Relative hrefs are taken as already
/// server-relative.
pub fn relative_href(base_uri: &str, href: &str) -> Option<String> {
    let path = canonical_path(href);
    let base = canonical_path(base_uri);
    let base = base.trim_end_matches('/');

    if base.is_empty() || !path.starts_with('/') {
        return Some(path.trim_matches('/').to_string());
    }

    match path.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            Some(rest.trim_matches('/').to_string())
        }
        _ => None,
    }
}

/// Turn an href into a server-relative tree path.
///
/// Absolute URLs lose their scheme and authority, repeated slashes collapse,
/// percent-escapes are decoded, a leading `base_uri` is removed, and
/// surrounding slashes are trimmed. `/principals/foo/`, `principals//foo`,
/// and `http://dav.example/principals/foo` all map to `principals/foo` under
/// the default base URI `/`. An absolute href outside `base_uri` keeps its
/// full path; see `relative_href` to detect that case.
pub fn normalize_href(base_uri: &str, href: &str) -> String {
    relative_href(base_uri, href)
        .unwrap_or_else(|| canonical_path(href).trim_matches('/').to_string())
}

/// Looks principals up in a resource tree.
pub struct PrincipalResolver<'a> {
    tree: &'a dyn ResourceTree,
    base_uri: &'a str,
}

impl<'a> PrincipalResolver<'a> {
    pub fn new(tree: &'a dyn ResourceTree, base_uri: &'a str) -> Self {
        Self { tree, base_uri }
    }

    /// Return the principal resource `href` points at.
    ///
    /// Pure lookup; nothing is created or modified.
    pub fn resolve(&self, href: &str) -> AclResult<Arc<dyn Resource>> {
        let Some(path) = relative_href(self.base_uri, href) else {
            debug!(
                href = %href,
                base_uri = %self.base_uri,
                "principal href lies outside the base URI"
            );
            return Err(AclError::NotRecognizedPrincipal {
                href: href.to_string(),
                miss: PrincipalMiss::OutsideBase,
            });
        };

        let Some(resource) = self.tree.lookup(&path) else {
            debug!(href = %href, path = %path, "principal href does not resolve");
            return Err(AclError::NotRecognizedPrincipal {
                href: href.to_string(),
                miss: PrincipalMiss::NotFound,
            });
        };

        if !resource.is_principal() {
            debug!(href = %href, path = %path, "href resolves to a non-principal resource");
            return Err(AclError::NotRecognizedPrincipal {
                href: href.to_string(),
                miss: PrincipalMiss::NotAPrincipal,
            });
        }

        Ok(resource)
    }
}
