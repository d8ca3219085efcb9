//! Error types for platon-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] platon_fs::Error),

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("No {kind} directory could be determined for this platform")]
    NoPlatformDir { kind: &'static str },

    #[error("Metadata of {resource_type} resource '{id}' does not match its type: {message}")]
    MetaMismatch {
        id: String,
        resource_type: String,
        message: String,
    },

    #[error("Invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: String },
}
