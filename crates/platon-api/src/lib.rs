//! Authenticated client for the PLaTOn platform API
//!
//! - [`PlatonClient`]: bearer-token HTTP client with a single transparent
//!   token refresh on `403`
//! - [`PlatformApi`]: the narrow set of calls the working copy manager and
//!   the authentication flow rely on
//! - [`SecretStore`]: where access and refresh tokens live
//! - [`token`]: local decoding of the access token payload

pub mod client;
pub mod error;
pub mod platform;
pub mod secrets;
pub mod token;

pub use client::{ApiConfig, PlatonClient};
pub use error::{Error, Result};
pub use platform::PlatformApi;
pub use secrets::{ACCESS_TOKEN, FileSecretStore, MemorySecretStore, REFRESH_TOKEN, SecretStore};
