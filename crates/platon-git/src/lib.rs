//! Bundle-based version-control transport for PLaTOn working copies
//!
//! The sync sequence only needs a handful of operations on a working copy.
//! They are expressed by the [`VcsTransport`] trait; [`GitCli`] implements
//! them by running the `git` binary.

pub mod cli;
pub mod error;
pub mod transport;

pub use cli::{GitCli, Identity};
pub use error::{Error, Result};
pub use transport::{CONFLICT_MARKERS, CommitOutcome, VcsTransport};
