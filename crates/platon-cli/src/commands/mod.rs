//! Command implementations for platon-cli

pub mod auth;
pub mod editor;
pub mod folders;
pub mod open;
pub mod sync;

pub use auth::{run_callback, run_connect};
pub use editor::{run_complete, run_hover, run_links};
pub use folders::run_folders;
pub use open::run_open;
pub use sync::{run_preview, run_sync};
