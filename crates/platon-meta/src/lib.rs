//! Resource model and settings for the PLaTOn workspace
//!
//! This crate provides:
//!
//! - **Schema types**: resources, users, permissions and metadata as served
//!   by the platform API (camelCase JSON)
//! - **Settings**: the `config.toml` loaded by the command-line front end

pub mod config;
pub mod error;
pub mod schema;

pub use config::{
    ApiSettings, AuthSettings, FailurePolicy, GitSettings, Settings, StorageSettings,
    SyncPolicy,
};
pub use error::{Error, Result};
pub use schema::{
    ApiEnvelope, FileVersion, Level, Resource, ResourceMeta, ResourcePermissions,
    ResourceStatistic, ResourceStatus, ResourceType, Topic, User, UserRole,
};
pub use schema::user::capitalize;
