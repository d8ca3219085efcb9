//! Core orchestration layer for the PLaTOn workspace
//!
//! This crate ties the API client and the version-control transport
//! together:
//!
//! - **Workspace folders**: which local directory holds which resource
//! - **Storage layout**: where working copies, bundles and locks live
//! - **Working copy manager**: acquire and sync a resource through bundles
//! - **Authentication flow**: login URL, redirect callback, session setup
//!
//! # Architecture
//!
//! ```text
//!                  platon-cli
//!                      |
//!        platon-core  ---  platon-editor
//!                      |
//!     +----------+-----+-----+----------+
//!     |          |           |          |
//! platon-fs platon-meta platon-api platon-git
//! ```

pub mod auth;
pub mod error;
pub mod session;
pub mod storage;
pub mod working_copy;
pub mod workspace;

pub use auth::{AuthFlow, AuthOutcome, CallbackParams, login_url, parse_callback};
pub use error::{AuthError, Error, Result};
pub use session::{SESSION_FILE, SessionState, SessionStore};
pub use storage::Storage;
pub use working_copy::{
    CopyState, LOCAL_COMMIT_MESSAGE, MERGE_COMMIT_MESSAGE, StepRecord, StepResult, SyncOutcome,
    SyncReport, SyncStep, WorkingCopy, WorkingCopyManager,
};
pub use workspace::{ResourceLocation, WorkspaceFolder, WorkspaceFolders};
