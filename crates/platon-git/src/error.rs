//! Error types for platon-git

use std::path::PathBuf;

/// Result type for platon-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the version-control binary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not run '{binary}': {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Bundle was not produced at {path}")]
    BundleMissing { path: PathBuf },
}
