//! Git repository fixtures.
//!
//! Working copies are exchanged as bundles, so most fixtures end with a
//! bundle file that a transport can clone or pull.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `cwd`, panicking with stderr on failure.
///
/// # Panics
/// Panics if git cannot be spawned or exits with a non-zero status.
pub fn run_git(cwd: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap_or_else(|e| panic!("run_git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "run_git: `git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Initialises a repository on `main` with one commit holding `files`.
///
/// Configures a local identity and disables commit signing so commits work
/// on machines without a global git config.
///
/// # Panics
/// Panics if any git or filesystem operation fails.
pub fn real_git_repo_with_files(path: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("real_git_repo_with_files: failed to create dir: {e}"));

    run_git(path, &["init"]);
    run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(path, &["config", "user.email", "platform@test.com"]);
    run_git(path, &["config", "user.name", "Platform"]);
    run_git(path, &["config", "commit.gpgsign", "false"]);

    for (name, content) in files {
        let file = path.join(name);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file, content)
            .unwrap_or_else(|e| panic!("real_git_repo_with_files: failed to write {name}: {e}"));
    }

    run_git(path, &["add", "."]);
    run_git(path, &["commit", "-m", "Initial commit"]);
}

/// Commit `content` as `file` in `repo`.
pub fn commit_file(repo: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo.join(file), content)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {file}: {e}"));
    run_git(repo, &["add", "."]);
    run_git(repo, &["commit", "-m", message]);
}

/// Write a bundle of `HEAD` and `main` of `repo` to `bundle`.
pub fn create_bundle(repo: &Path, bundle: &Path) {
    run_git(
        repo,
        &["bundle", "create", &bundle.to_string_lossy(), "HEAD", "main"],
    );
}

/// Commit summaries of `HEAD`, newest first, read through `git2`.
///
/// # Panics
/// Panics if `path` is not a repository with at least one commit.
pub fn commit_messages(path: &Path) -> Vec<String> {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("commit_messages: cannot open {}: {e}", path.display()));
    let mut walk = repo.revwalk().unwrap();
    walk.push_head().unwrap();

    walk.map(|oid| {
        let commit = repo.find_commit(oid.unwrap()).unwrap();
        commit.summary().unwrap_or_default().to_string()
    })
    .collect()
}
