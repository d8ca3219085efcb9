//! Shared test utilities for the PLaTOn workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures backed by the real `git` binary
//! - [`transport`]: [`FakeTransport`], a scripted [`platon_git::VcsTransport`]
//! - [`platform`]: [`FakePlatform`], an in-memory [`platon_api::PlatformApi`]
//! - [`samples`]: resource, user and token builders

pub mod git;
pub mod platform;
pub mod samples;
pub mod transport;

pub use platform::FakePlatform;
pub use transport::{Call, FakeTransport, Op};
