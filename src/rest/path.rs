//! URL composition for resource operations.
//!
//! Every resource URL has the shape
//! `{host}[/topologies/{scope}]{collection_path}[/{uid}]`:
//!
//! - the scope prefix nests a collection under a parent topology
//! - the uid suffix addresses a single resource in the collection
//!
//! The topology collection itself is never nested: a scope passed together
//! with [`SCOPE_ROOT`] as the collection path is ignored.
//!
//! Identifiers are inserted verbatim. Callers are expected to pass URL-safe
//! ids (the service only ever hands out such ids).
//!
//! # Example
//!
//! ```rust
//! use tbclient::rest::build_resource_path;
//!
//! let url = build_resource_path("http://h", None, "/topologies", None);
//! assert_eq!(url, "http://h/topologies");
//!
//! let url = build_resource_path("http://h", Some("T1"), "/vms", Some("R2"));
//! assert_eq!(url, "http://h/topologies/T1/vms/R2");
//! ```

/// Collection under which scoped resources are nested.
pub const SCOPE_ROOT: &str = "/topologies";

/// Returns the scope prefix for an optional topology uid.
///
/// `None` and the empty string both mean "top level" and yield `""`.
///
/// # Example
///
/// ```rust
/// use tbclient::rest::scope_prefix;
///
/// assert_eq!(scope_prefix(Some("abc")), "/topologies/abc");
/// assert_eq!(scope_prefix(Some("")), "");
/// assert_eq!(scope_prefix(None), "");
/// ```
#[must_use]
pub fn scope_prefix(topology_uid: Option<&str>) -> String {
    match topology_uid {
        Some(uid) if !uid.is_empty() => format!("{SCOPE_ROOT}/{uid}"),
        _ => String::new(),
    }
}

/// Builds the absolute URL for a collection or a single resource.
///
/// # Arguments
///
/// * `host` - Base host URL, without trailing slash
/// * `topology_uid` - Optional scoping topology; empty means none
/// * `collection_path` - The resource collection path (e.g. `/topologies`)
/// * `uid` - Optional resource uid; empty means none
///
/// # Example
///
/// ```rust
/// use tbclient::rest::build_resource_path;
///
/// // Topologies are top-level only
/// let url = build_resource_path("http://h", Some("T1"), "/topologies", Some("R2"));
/// assert_eq!(url, "http://h/topologies/R2");
/// ```
#[must_use]
pub fn build_resource_path(
    host: &str,
    topology_uid: Option<&str>,
    collection_path: &str,
    uid: Option<&str>,
) -> String {
    let prefix = if collection_path == SCOPE_ROOT {
        String::new()
    } else {
        scope_prefix(topology_uid)
    };
    match uid {
        Some(uid) if !uid.is_empty() => format!("{host}{prefix}{collection_path}/{uid}"),
        _ => format!("{host}{prefix}{collection_path}"),
    }
}
