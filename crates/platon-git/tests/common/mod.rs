//! Real git repositories for transport tests.

use std::fs;
use std::path::Path;
use std::process::Command;

use platon_git::{GitCli, Identity};

pub fn git(cwd: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    assert!(
        output.status.success(),
        "`git {args:?}` failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Repository on branch `main` with one commit holding `main.ple`.
pub fn origin_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", "origin@test.com"]);
    git(path, &["config", "user.name", "Origin"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    fs::write(path.join("main.ple"), "title == Fractions\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
}

/// Commit `content` to `file` in `repo`.
pub fn commit_file(repo: &Path, file: &str, content: &str) {
    fs::write(repo.join(file), content).unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-m", &format!("edit {file}")]);
}

/// Bundle `HEAD` and `main` of `repo` into `bundle`.
pub fn bundle(repo: &Path, bundle: &Path) {
    git(
        repo,
        &["bundle", "create", &bundle.to_string_lossy(), "HEAD", "main"],
    );
}

pub fn transport() -> GitCli {
    GitCli::default().with_identity(Identity {
        name: "Local".to_string(),
        email: "local@test.com".to_string(),
    })
}

pub fn log_messages(repo: &Path) -> Vec<String> {
    let output = Command::new("git")
        .args(["log", "--format=%s"])
        .current_dir(repo)
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
