//! Transport trait used by the sync sequence

use std::path::Path;

use async_trait::async_trait;

use crate::Result;

/// Patterns whose presence in a tracked file means a merge is unresolved.
pub const CONFLICT_MARKERS: [&str; 3] = ["<<<<<<< ", "=======", ">>>>>>> "];

/// Result of committing every change of a working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The tree had nothing to record
    NothingToCommit,
}

/// Operations on a local working copy, with bundles as the only transport.
#[async_trait]
pub trait VcsTransport: Send + Sync {
    /// Materialize `bundle` as a new working copy at `dest`.
    async fn clone_bundle(&self, bundle: &Path, dest: &Path) -> Result<()>;

    /// Merge the history carried by `bundle` into `repo` (no rebase).
    async fn pull_bundle(&self, repo: &Path, bundle: &Path) -> Result<()>;

    /// Stage everything and commit it with `message`.
    async fn commit_all(&self, repo: &Path, message: &str) -> Result<CommitOutcome>;

    /// Whether the working tree and index have no pending change.
    async fn is_clean(&self, repo: &Path) -> Result<bool>;

    /// Whether any tracked file contains one of [`CONFLICT_MARKERS`].
    async fn has_conflicts(&self, repo: &Path) -> Result<bool>;

    /// Package `HEAD` and `main` of `repo` into `bundle`.
    async fn create_bundle(&self, repo: &Path, bundle: &Path) -> Result<()>;
}
