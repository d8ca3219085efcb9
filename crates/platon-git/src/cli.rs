//! [`VcsTransport`] backed by the `git` command-line tool

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;

use crate::transport::{CONFLICT_MARKERS, CommitOutcome, VcsTransport};
use crate::{Error, Result};

/// Author and committer used for the commits made during a sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Runs `git` as a subprocess for every transport operation.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
    identity: Option<Identity>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            identity: None,
        }
    }

    /// Commit as `identity` instead of whatever git config provides.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run git in `cwd` and return its raw output, whatever the exit status.
    async fn output(&self, cwd: Option<&Path>, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new(&self.binary);
        if let Some(identity) = &self.identity {
            cmd.arg("-c")
                .arg(format!("user.name={}", identity.name))
                .arg("-c")
                .arg(format!("user.email={}", identity.email));
        }
        cmd.args(args).kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!(binary = %self.binary.display(), ?args, cwd = ?cwd, "Running git");
        cmd.output().await.map_err(|source| Error::Spawn {
            binary: self.binary.clone(),
            source,
        })
    }

    /// Run git and fail on a non-zero exit status.
    async fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<String> {
        let output = self.output(cwd, args).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(command_failed(args, &output))
        }
    }
}

fn command_failed(args: &[&str], output: &Output) -> Error {
    Error::CommandFailed {
        command: format!("git {}", args.join(" ")),
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

#[async_trait]
impl VcsTransport for GitCli {
    async fn clone_bundle(&self, bundle: &Path, dest: &Path) -> Result<()> {
        let bundle = bundle.to_string_lossy();
        let dest = dest.to_string_lossy();
        self.run(None, &["clone", &bundle, &dest]).await?;
        Ok(())
    }

    async fn pull_bundle(&self, repo: &Path, bundle: &Path) -> Result<()> {
        let bundle = bundle.to_string_lossy();
        self.run(Some(repo), &["pull", "--no-rebase", &bundle]).await?;
        Ok(())
    }

    async fn commit_all(&self, repo: &Path, message: &str) -> Result<CommitOutcome> {
        self.run(Some(repo), &["add", "."]).await?;
        if self.is_clean(repo).await? {
            return Ok(CommitOutcome::NothingToCommit);
        }
        self.run(Some(repo), &["commit", "-m", message]).await?;
        Ok(CommitOutcome::Committed)
    }

    async fn is_clean(&self, repo: &Path) -> Result<bool> {
        let stdout = self.run(Some(repo), &["status", "--porcelain"]).await?;
        Ok(stdout.trim().is_empty())
    }

    async fn has_conflicts(&self, repo: &Path) -> Result<bool> {
        let [ours, middle, theirs] = CONFLICT_MARKERS;
        let args = ["grep", "-q", "-e", ours, "-e", middle, "-e", theirs];
        let output = self.output(Some(repo), &args).await?;

        // git grep: 0 = match found, 1 = no match, anything else = error
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(command_failed(&args, &output)),
        }
    }

    async fn create_bundle(&self, repo: &Path, bundle: &Path) -> Result<()> {
        let target = bundle.to_string_lossy();
        self.run(Some(repo), &["bundle", "create", &target, "HEAD", "main"])
            .await?;
        if !bundle.exists() {
            return Err(Error::BundleMissing {
                path: bundle.to_path_buf(),
            });
        }
        Ok(())
    }
}
