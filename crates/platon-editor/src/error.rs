//! Error types for platon-editor

/// Result type for platon-editor operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] platon_fs::Error),

    #[error(transparent)]
    Reference(#[from] crate::reference::ReferenceError),
}
