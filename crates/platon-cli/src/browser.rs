//! Opening URLs and files with the system handler

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{CliError, Result};

/// Find the full path of a binary on PATH (cross-platform)
fn which(binary: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let exts = if cfg!(windows) {
        vec![".exe", ".cmd", ".bat", ""]
    } else {
        vec![""]
    };

    for dir in std::env::split_paths(&path_var) {
        for ext in &exts {
            let candidate = dir.join(format!("{}{}", binary, ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Command line opening `target`: `$BROWSER`, else the platform opener.
fn opener(target: &str) -> Option<Command> {
    if let Some(browser) = std::env::var_os("BROWSER").filter(|b| !b.is_empty()) {
        let mut cmd = Command::new(browser);
        cmd.arg(target);
        return Some(cmd);
    }

    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", target]);
        return Some(cmd);
    }

    let binary = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let path = which(binary)?;
    let mut cmd = Command::new(path);
    cmd.arg(target);
    Some(cmd)
}

/// Hand `target` (URL or file path) to the browser without waiting for it.
pub fn open(target: &str) -> Result<()> {
    let mut cmd = opener(target).ok_or_else(|| {
        CliError::user("No browser found. Set BROWSER or open the link manually.")
    })?;
    tracing::debug!(?cmd, "Opening in browser");

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
