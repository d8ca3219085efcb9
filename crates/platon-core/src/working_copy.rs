//! Local working copies and their bundle-based synchronization
//!
//! A resource is edited in `<storage>/<id>`, a clone of the bundle served by
//! the platform. [`WorkingCopyManager::sync`] reconciles it with the remote:
//!
//! 1. stop if conflict markers are already present
//! 2. commit local changes
//! 3. download a fresh bundle and merge it (no rebase)
//! 4. stop if the merge left conflict markers
//! 5. commit the merge if the tree is dirty
//! 6. bundle `HEAD` and `main` and upload it
//!
//! Failures of steps 2, 3 and 5 are handled according to the configured
//! [`SyncPolicy`]: recorded as a warning and skipped, or fatal to the sync.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use platon_api::PlatformApi;
use platon_fs::LockGuard;
use platon_git::{CommitOutcome, VcsTransport};
use platon_meta::{FailurePolicy, Resource, SyncPolicy};
use serde::Serialize;

use crate::session::SessionStore;
use crate::storage::Storage;
use crate::workspace::ResourceLocation;
use crate::{Error, Result};

/// Message of the commit recording local edits
pub const LOCAL_COMMIT_MESSAGE: &str = "commit local changes";
/// Message of the commit concluding a merge with the remote
pub const MERGE_COMMIT_MESSAGE: &str = "merge remote changes";

/// Lifecycle state of a working copy, as observed during one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyState {
    Absent,
    Cloning,
    Ready,
    Committing,
    Pulling,
    Conflict,
    Pushing,
}

/// Step of a sync that may fail without ending it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    LocalCommit,
    Pull,
    MergeCommit,
    Bundle,
    Upload,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::LocalCommit => "local commit",
            SyncStep::Pull => "pull",
            SyncStep::MergeCommit => "merge commit",
            SyncStep::Bundle => "bundle",
            SyncStep::Upload => "upload",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum StepResult {
    Done,
    /// Nothing to do, e.g. no change to commit
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: SyncStep,
    pub result: StepResult,
}

/// How a sync ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SyncOutcome {
    /// The merged history was uploaded
    Synced,
    /// Conflict markers are present in the working tree; nothing was uploaded
    Conflict,
    UploadFailed { reason: String },
    /// A step configured as fatal failed
    Aborted { step: SyncStep, reason: String },
}

impl SyncOutcome {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            SyncOutcome::Synced => "Resource successfully synchronized with PLaTOn".to_string(),
            SyncOutcome::Conflict => "Your local repository contains conflicts, please resolve \
                                      them before syncing with the server."
                .to_string(),
            SyncOutcome::UploadFailed { .. } => {
                "An error occurred while trying to sync with the server.".to_string()
            }
            SyncOutcome::Aborted { step, reason } => {
                format!("Sync aborted, the {step} step failed: {reason}")
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }
}

/// Everything that happened during one sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub resource_id: String,
    pub outcome: SyncOutcome,
    pub steps: Vec<StepRecord>,
    pub transitions: Vec<CopyState>,
}

impl SyncReport {
    fn new(resource_id: &str, cloned: bool) -> Self {
        let transitions = if cloned {
            vec![CopyState::Absent, CopyState::Cloning, CopyState::Ready]
        } else {
            vec![CopyState::Ready]
        };
        Self {
            resource_id: resource_id.to_string(),
            outcome: SyncOutcome::Synced,
            steps: Vec::new(),
            transitions,
        }
    }

    /// Failures that did not stop the sync.
    pub fn warnings(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|record| match &record.result {
                StepResult::Failed(reason) => Some(format!("{} failed: {reason}", record.step)),
                _ => None,
            })
            .collect()
    }

    pub fn step(&self, step: SyncStep) -> Option<&StepResult> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.result)
    }

    fn enter(&mut self, state: CopyState) {
        tracing::debug!(id = %self.resource_id, ?state, "Working copy state");
        self.transitions.push(state);
    }

    fn record(&mut self, step: SyncStep, result: StepResult) {
        self.steps.push(StepRecord { step, result });
    }

    fn finish(mut self, outcome: SyncOutcome) -> Self {
        if outcome == SyncOutcome::Conflict {
            self.enter(CopyState::Conflict);
        }
        tracing::info!(id = %self.resource_id, ?outcome, "Sync finished");
        self.outcome = outcome;
        self
    }
}

/// A working copy ready for editing
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingCopy {
    pub resource: Resource,
    pub path: PathBuf,
    /// Whether an existing directory was reused instead of cloned
    pub reused: bool,
}

/// Owns the working copies of the storage area.
pub struct WorkingCopyManager {
    platform: Arc<dyn PlatformApi>,
    transport: Arc<dyn VcsTransport>,
    storage: Storage,
    session: SessionStore,
    policy: SyncPolicy,
}

impl WorkingCopyManager {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        transport: Arc<dyn VcsTransport>,
        storage: Storage,
        session: SessionStore,
    ) -> Self {
        Self {
            platform,
            transport,
            storage,
            session,
            policy: SyncPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn platform(&self) -> &Arc<dyn PlatformApi> {
        &self.platform
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Resource whose registered folder contains `path`.
    pub fn locate(&self, path: &Path) -> Result<ResourceLocation> {
        self.session
            .load()?
            .folders
            .resource_for(path)
            .ok_or_else(|| Error::NotInWorkspace {
                path: path.to_path_buf(),
            })
    }

    /// Make sure a working copy of `id` exists and is registered.
    ///
    /// Requires write permission on the resource. An existing directory is
    /// reused as is.
    pub async fn acquire(&self, id: &str) -> Result<WorkingCopy> {
        self.storage.check_id(id)?;
        let _lock = self.lock(id).await?;
        self.acquire_locked(id).await
    }

    /// Synchronize the working copy of `id` with the platform.
    ///
    /// Two syncs of the same resource run one after the other.
    pub async fn sync(&self, id: &str) -> Result<SyncReport> {
        self.storage.check_id(id)?;
        let _lock = self.lock(id).await?;
        let copy = self.acquire_locked(id).await?;
        let repo = copy.path.as_path();
        let mut report = SyncReport::new(id, !copy.reused);

        if self.has_conflicts(repo).await {
            return Ok(report.finish(SyncOutcome::Conflict));
        }

        report.enter(CopyState::Committing);
        let committed = self.transport.commit_all(repo, LOCAL_COMMIT_MESSAGE).await;
        if let Some(outcome) = self.settle(&mut report, SyncStep::LocalCommit, committed) {
            return Ok(report.finish(outcome));
        }

        report.enter(CopyState::Pulling);
        let pulled = self.pull(id, repo).await.map(|()| StepResult::Done);
        if let Some(outcome) = self.record(&mut report, SyncStep::Pull, self.policy.pull, pulled) {
            return Ok(report.finish(outcome));
        }

        if self.has_conflicts(repo).await {
            return Ok(report.finish(SyncOutcome::Conflict));
        }
        report.enter(CopyState::Ready);

        let clean = match self.transport.is_clean(repo).await {
            Ok(clean) => clean,
            Err(e) => {
                tracing::warn!(id, error = %e, "Could not read the tree status, committing anyway");
                false
            }
        };
        if clean {
            report.record(SyncStep::MergeCommit, StepResult::Skipped);
        } else {
            report.enter(CopyState::Committing);
            let merged = self.transport.commit_all(repo, MERGE_COMMIT_MESSAGE).await;
            if let Some(outcome) = self.settle(&mut report, SyncStep::MergeCommit, merged) {
                return Ok(report.finish(outcome));
            }
        }

        report.enter(CopyState::Pushing);
        let outcome = self.push(id, repo, &mut report).await;
        report.enter(CopyState::Ready);
        Ok(report.finish(outcome))
    }

    /// Sync every registered folder, in registration order.
    ///
    /// Stops at the first resource that cannot be acquired.
    pub async fn sync_all(&self) -> Result<Vec<SyncReport>> {
        let ids = self.session.load()?.folders.resource_ids();
        let mut reports = Vec::with_capacity(ids.len());
        for id in ids {
            reports.push(self.sync(&id).await?);
        }
        Ok(reports)
    }

    async fn acquire_locked(&self, id: &str) -> Result<WorkingCopy> {
        let resource = self.platform.get_resource(id).await?;
        if !resource.can_write() {
            return Err(Error::PermissionDenied { id: id.to_string() });
        }

        let path = self.storage.copy_dir(id);
        let reused = path.exists();
        if reused {
            tracing::debug!(id, path = %path.display(), "Reusing working copy");
        } else {
            tracing::info!(id, name = %resource.name, "Cloning working copy");
            self.storage.ensure()?;
            let bundle = self.storage.bundle_path(id);
            let cloned = self.clone_into(id, &bundle, &path).await;
            self.storage.discard_bundle(&bundle);
            cloned?;
        }

        let name = resource.name.clone();
        let folder = path.clone();
        if self.session.update(|s| s.folders.register(folder, name))? {
            tracing::info!(id, path = %path.display(), "Registered workspace folder");
        }

        Ok(WorkingCopy {
            resource,
            path,
            reused,
        })
    }

    async fn clone_into(&self, id: &str, bundle: &Path, dest: &Path) -> Result<()> {
        self.platform.download_bundle(id, bundle).await?;
        self.transport.clone_bundle(bundle, dest).await?;
        Ok(())
    }

    async fn lock(&self, id: &str) -> Result<LockGuard> {
        let path = self.storage.lock_path(id);
        if let Some(guard) = LockGuard::try_acquire(&path)? {
            return Ok(guard);
        }

        tracing::info!(id, "Another operation holds the resource, waiting for it");
        let guard = tokio::task::spawn_blocking(move || LockGuard::acquire(&path))
            .await
            .map_err(std::io::Error::other)??;
        Ok(guard)
    }

    /// Conflict markers present; a detection failure counts as a conflict.
    async fn has_conflicts(&self, repo: &Path) -> bool {
        match self.transport.has_conflicts(repo).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(repo = %repo.display(), error = %e, "Conflict detection failed");
                true
            }
        }
    }

    async fn pull(&self, id: &str, repo: &Path) -> Result<()> {
        let bundle = self.storage.bundle_path(id);
        let result: Result<()> = async {
            self.platform.download_bundle(id, &bundle).await?;
            self.transport.pull_bundle(repo, &bundle).await?;
            Ok(())
        }
        .await;
        self.storage.discard_bundle(&bundle);
        result
    }

    async fn push(&self, id: &str, repo: &Path, report: &mut SyncReport) -> SyncOutcome {
        let bundle = self.storage.bundle_path(id);

        if let Err(e) = self.transport.create_bundle(repo, &bundle).await {
            tracing::warn!(id, error = %e, "Error while bundling the resource");
            report.record(SyncStep::Bundle, StepResult::Failed(e.to_string()));
            self.storage.discard_bundle(&bundle);
            return SyncOutcome::UploadFailed {
                reason: e.to_string(),
            };
        }
        report.record(SyncStep::Bundle, StepResult::Done);

        let uploaded = self.platform.upload_bundle(id, &bundle).await;
        self.storage.discard_bundle(&bundle);

        match uploaded {
            Ok(()) => {
                report.record(SyncStep::Upload, StepResult::Done);
                SyncOutcome::Synced
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Upload failed");
                report.record(SyncStep::Upload, StepResult::Failed(e.to_string()));
                SyncOutcome::UploadFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Record a commit step under its policy.
    fn settle(
        &self,
        report: &mut SyncReport,
        step: SyncStep,
        committed: platon_git::Result<CommitOutcome>,
    ) -> Option<SyncOutcome> {
        let policy = match step {
            SyncStep::MergeCommit => self.policy.merge_commit,
            _ => self.policy.local_commit,
        };
        let result = committed
            .map(|outcome| match outcome {
                CommitOutcome::Committed => StepResult::Done,
                CommitOutcome::NothingToCommit => StepResult::Skipped,
            })
            .map_err(Error::from);
        self.record(report, step, policy, result)
    }

    /// Record `result`; returns the outcome ending the sync, if any.
    fn record(
        &self,
        report: &mut SyncReport,
        step: SyncStep,
        policy: FailurePolicy,
        result: Result<StepResult>,
    ) -> Option<SyncOutcome> {
        match result {
            Ok(done) => {
                report.record(step, done);
                None
            }
            Err(e) => {
                let reason = e.to_string();
                report.record(step, StepResult::Failed(reason.clone()));
                match policy {
                    FailurePolicy::Continue => {
                        tracing::warn!(id = %report.resource_id, %step, error = %reason, "Sync step failed, continuing");
                        None
                    }
                    FailurePolicy::Abort => {
                        tracing::warn!(id = %report.resource_id, %step, error = %reason, "Sync step failed, aborting");
                        Some(SyncOutcome::Aborted { step, reason })
                    }
                }
            }
        }
    }
}
