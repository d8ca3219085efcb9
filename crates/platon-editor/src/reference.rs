//! File references of the `.ple` language
//!
//! A reference names a file of a resource at a version:
//!
//! ```text
//! /resource:version/path/to/file as alias
//! path/to/file                 same resource, context version
//! :v2/path/to/file             same resource, version v2
//! ```
//!
//! Resolution is best-effort: any input yields a [`FileReference`].
//! Callers wanting to reject malformed references use
//! [`validate_reference`].

use serde::Serialize;

/// Placeholder for "the resource the document belongs to"
const RELATIVE: &str = "relative";
const LATEST: &str = "latest";

/// Resource and version a reference is resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceContext {
    pub resource: String,
    pub version: Option<String>,
}

impl ReferenceContext {
    pub fn new(resource: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            resource: resource.into(),
            version: version.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReference {
    pub alias: Option<String>,
    pub resource: String,
    pub version: String,
    /// Path inside the resource
    pub relpath: String,
    /// `resource:version/relpath`
    pub abspath: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("Reference names no resource")]
    EmptyResource,

    #[error("Reference to '{resource}' names no file")]
    EmptyPath { resource: String },

    #[error("Invalid resource id '{resource}' in reference")]
    InvalidResource { resource: String },
}

/// Resolve `token` against `context`.
pub fn resolve_file_reference(token: &str, context: &ReferenceContext) -> FileReference {
    let token = token.trim();
    let absolute = if token.starts_with('/') {
        token.to_string()
    } else if token.starts_with(':') {
        let (version, rest) = token.split_once('/').unwrap_or((token, ""));
        format!("/{RELATIVE}{version}/{rest}")
    } else {
        format!("/{RELATIVE}/{token}")
    };

    let mut pieces = absolute.split(" as ");
    let path = pieces.next().unwrap_or_default().trim();
    let alias = pieces
        .next()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    let mut segments = path.split('/').filter(|s| !s.trim().is_empty());
    let head = segments.next().unwrap_or_default();
    let relpath = segments.collect::<Vec<_>>().join("/");

    let mut head = head.split(':');
    let resource = head.next().unwrap_or_default();
    let version = head.next();

    let (resource, version) = if resource == RELATIVE {
        // An explicit but empty version still falls back to latest
        let version = version.or(context.version.as_deref());
        (context.resource.clone(), version)
    } else {
        (resource.to_string(), version)
    };
    let version = version
        .filter(|v| !v.is_empty())
        .unwrap_or(LATEST)
        .to_string();

    FileReference {
        abspath: format!("{resource}:{version}/{relpath}"),
        alias,
        resource,
        version,
        relpath,
    }
}

/// Reject references that cannot name a file.
pub fn validate_reference(reference: &FileReference) -> Result<(), ReferenceError> {
    let resource = &reference.resource;
    if resource.is_empty() {
        return Err(ReferenceError::EmptyResource);
    }
    if resource.contains(|c: char| c.is_whitespace() || c == ':') {
        return Err(ReferenceError::InvalidResource {
            resource: resource.clone(),
        });
    }
    if reference.relpath.is_empty() {
        return Err(ReferenceError::EmptyPath {
            resource: resource.clone(),
        });
    }
    Ok(())
}
