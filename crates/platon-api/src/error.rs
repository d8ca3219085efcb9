//! Error types for platon-api

/// Result type for platon-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the platform
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection, TLS, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{method} {url} failed with HTTP {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
    },

    /// The `403` triggered refresh could not renew the access token
    #[error("Token refresh failed: {reason}")]
    RefreshFailed { reason: String },

    /// A credential is missing from the secret store
    #[error("Not authenticated: no {key} stored. Run `platon connect` first.")]
    MissingCredential { key: &'static str },

    /// The access token payload could not be decoded
    #[error("Invalid access token: {reason}")]
    InvalidToken { reason: String },

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Secret store error: {message}")]
    Secrets { message: String },

    #[error("Filesystem error: {0}")]
    Fs(#[from] platon_fs::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
