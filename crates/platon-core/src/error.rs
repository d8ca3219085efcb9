//! Error types for platon-core

use std::path::PathBuf;

/// Result type for platon-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in platon-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user may read the resource but not edit its files
    #[error("You don't have the rights to edit these files.")]
    PermissionDenied { id: String },

    /// The path is not inside a registered workspace folder
    #[error("You must open a resource within a workspace folder to use this command.")]
    NotInWorkspace { path: PathBuf },

    /// The id cannot name a directory of the storage area
    #[error("Invalid resource id '{id}'")]
    InvalidResourceId { id: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Api(#[from] platon_api::Error),

    #[error(transparent)]
    Git(#[from] platon_git::Error),

    #[error(transparent)]
    Fs(#[from] platon_fs::Error),

    #[error(transparent)]
    Meta(#[from] platon_meta::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors of the redirect-based authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication failed: the callback carries no {param}")]
    MissingToken { param: &'static str },

    #[error("Authentication failed: invalid callback URI '{uri}': {reason}")]
    InvalidCallback { uri: String, reason: String },

    #[error("Authentication failed: {reason}")]
    InvalidToken { reason: String },

    #[error("An error occurred while fetching the profile of '{username}': {source}")]
    ProfileFetch {
        username: String,
        #[source]
        source: platon_api::Error,
    },
}
