//! Scripted [`VcsTransport`] recording every call.
//!
//! Answers to `has_conflicts` and `is_clean` are taken from queues; once a
//! queue is empty the default answer (no conflict, clean tree) is returned.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use platon_git::{CommitOutcome, Error, Result, VcsTransport};

/// Transport operation, used to script failures and to assert on order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CloneBundle,
    PullBundle,
    CommitAll,
    IsClean,
    HasConflicts,
    CreateBundle,
}

/// A recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CloneBundle { bundle: PathBuf, dest: PathBuf },
    PullBundle { repo: PathBuf, bundle: PathBuf },
    CommitAll { repo: PathBuf, message: String },
    IsClean { repo: PathBuf },
    HasConflicts { repo: PathBuf },
    CreateBundle { repo: PathBuf, bundle: PathBuf },
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Call::CloneBundle { .. } => Op::CloneBundle,
            Call::PullBundle { .. } => Op::PullBundle,
            Call::CommitAll { .. } => Op::CommitAll,
            Call::IsClean { .. } => Op::IsClean,
            Call::HasConflicts { .. } => Op::HasConflicts,
            Call::CreateBundle { .. } => Op::CreateBundle,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    conflicts: VecDeque<bool>,
    clean: VecDeque<bool>,
    failing: HashSet<Op>,
    /// Whether the bundle handed to `pull_bundle` existed at call time
    pulled_bundle_present: Vec<bool>,
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    state: Mutex<State>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue successive answers of `has_conflicts`.
    pub fn with_conflicts(self, answers: &[bool]) -> Self {
        self.lock().conflicts.extend(answers);
        self
    }

    /// Queue successive answers of `is_clean`.
    pub fn with_clean(self, answers: &[bool]) -> Self {
        self.lock().clean.extend(answers);
        self
    }

    /// Make every call of `op` fail with a command error.
    pub fn failing(self, op: Op) -> Self {
        self.lock().failing.insert(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.lock().calls.iter().map(Call::op).collect()
    }

    pub fn commit_messages(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::CommitAll { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn pulled_bundle_present(&self) -> Vec<bool> {
        self.lock().pulled_bundle_present.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: Call) -> Result<()> {
        let op = call.op();
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(Error::CommandFailed {
                command: format!("fake {op:?}"),
                code: 128,
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VcsTransport for FakeTransport {
    async fn clone_bundle(&self, bundle: &Path, dest: &Path) -> Result<()> {
        self.record(Call::CloneBundle {
            bundle: bundle.to_path_buf(),
            dest: dest.to_path_buf(),
        })?;
        tokio::fs::create_dir_all(dest)
            .await
            .map_err(|e| Error::CommandFailed {
                command: "fake CloneBundle".to_string(),
                code: 128,
                stderr: e.to_string(),
            })
    }

    async fn pull_bundle(&self, repo: &Path, bundle: &Path) -> Result<()> {
        self.lock().pulled_bundle_present.push(bundle.exists());
        self.record(Call::PullBundle {
            repo: repo.to_path_buf(),
            bundle: bundle.to_path_buf(),
        })
    }

    async fn commit_all(&self, repo: &Path, message: &str) -> Result<CommitOutcome> {
        self.record(Call::CommitAll {
            repo: repo.to_path_buf(),
            message: message.to_string(),
        })?;
        Ok(CommitOutcome::Committed)
    }

    async fn is_clean(&self, repo: &Path) -> Result<bool> {
        self.record(Call::IsClean {
            repo: repo.to_path_buf(),
        })?;
        Ok(self.lock().clean.pop_front().unwrap_or(true))
    }

    async fn has_conflicts(&self, repo: &Path) -> Result<bool> {
        self.record(Call::HasConflicts {
            repo: repo.to_path_buf(),
        })?;
        Ok(self.lock().conflicts.pop_front().unwrap_or(false))
    }

    async fn create_bundle(&self, repo: &Path, bundle: &Path) -> Result<()> {
        self.record(Call::CreateBundle {
            repo: repo.to_path_buf(),
            bundle: bundle.to_path_buf(),
        })?;
        tokio::fs::write(bundle, b"fake bundle")
            .await
            .map_err(|_| Error::BundleMissing {
                path: bundle.to_path_buf(),
            })
    }
}
