//! Session state persisted between invocations
//!
//! Holds the authenticated user's profile and the workspace folders. Lives
//! in the config directory, outside the storage area, so wiping working
//! copies does not forget who is logged in.

use std::path::{Path, PathBuf};

use platon_fs::{ConfigStore, LockGuard};
use platon_meta::User;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::workspace::WorkspaceFolders;

/// File name of the session state inside the config directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub folders: WorkspaceFolders,
}

/// Reads and updates [`SessionState`] on disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config_dir>/session.json`.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join(SESSION_FILE))
    }

    /// Current state; a missing file is an empty session.
    pub fn load(&self) -> Result<SessionState> {
        Ok(ConfigStore::new().load_or_default(&self.path)?)
    }

    /// Apply `f` to the stored state and write it back, under a file lock.
    pub fn update<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> Result<T> {
        let _lock = LockGuard::acquire(&self.lock_path())?;
        let store = ConfigStore::new();
        let mut state: SessionState = store.load_or_default(&self.path)?;
        let value = f(&mut state);
        store.save(&self.path, &state)?;
        Ok(value)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_session() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::in_dir(temp.path());

        let state = store.load().unwrap();
        assert!(state.user.is_none());
        assert!(state.folders.is_empty());
    }

    #[test]
    fn test_update_persists() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::in_dir(temp.path());

        let added = store
            .update(|s| s.folders.register("/storage/abc", "Fractions"))
            .unwrap();
        assert!(added);

        let state = SessionStore::in_dir(temp.path()).load().unwrap();
        assert_eq!(state.folders.resource_ids(), vec!["abc".to_string()]);
        assert!(temp.path().join(SESSION_FILE).exists());
    }
}
