//! Filesystem helpers for the PLaTOn workspace
//!
//! Provides atomic writes, advisory locks and format-agnostic config files.

pub mod config;
pub mod error;
pub mod io;
pub mod lock;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use lock::LockGuard;
