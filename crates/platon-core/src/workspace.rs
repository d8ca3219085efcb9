//! Registry of workspace folders
//!
//! A workspace folder is a local directory named after the id of the
//! resource it holds. Lookups answer "which resource does this file belong
//! to".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A registered folder and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFolder {
    pub path: PathBuf,
    pub name: String,
}

impl WorkspaceFolder {
    /// Resource id, the final component of the folder path.
    pub fn resource_id(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }
}

/// Resource owning a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub id: String,
    /// Root of the workspace folder
    pub root: PathBuf,
    pub name: String,
}

/// Ordered set of workspace folders, unique by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceFolders {
    folders: Vec<WorkspaceFolder>,
}

impl WorkspaceFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `name`.
    ///
    /// Returns `false` when the path was already registered; its name is
    /// updated in place.
    pub fn register(&mut self, path: impl Into<PathBuf>, name: impl Into<String>) -> bool {
        let path = path.into();
        let name = name.into();
        if let Some(existing) = self.folders.iter_mut().find(|f| f.path == path) {
            existing.name = name;
            return false;
        }
        self.folders.push(WorkspaceFolder { path, name });
        true
    }

    /// Remove `path`. Returns whether it was registered.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.folders.len();
        self.folders.retain(|f| f.path != path);
        self.folders.len() != before
    }

    /// Drop every folder located under `root`.
    pub fn remove_under(&mut self, root: &Path) -> usize {
        let before = self.folders.len();
        self.folders.retain(|f| !f.path.starts_with(root));
        before - self.folders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkspaceFolder> {
        self.folders.iter()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Resource ids in registration order.
    pub fn resource_ids(&self) -> Vec<String> {
        self.folders
            .iter()
            .filter_map(WorkspaceFolder::resource_id)
            .collect()
    }

    /// Resource whose folder contains `path`, first registered folder wins.
    ///
    /// Paths are compared component-wise: `/s/abc` does not contain
    /// `/s/abcd/file`.
    pub fn resource_for(&self, path: &Path) -> Option<ResourceLocation> {
        self.folders.iter().find_map(|folder| {
            if !path.starts_with(&folder.path) {
                return None;
            }
            Some(ResourceLocation {
                id: folder.resource_id()?,
                root: folder.path.clone(),
                name: folder.name.clone(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn folders() -> WorkspaceFolders {
        let mut folders = WorkspaceFolders::new();
        folders.register("/storage/abc", "Fractions");
        folders.register("/storage/xyz", "Vectors");
        folders
    }

    #[rstest]
    #[case("/storage/abc/main.ple", Some("abc"))]
    #[case("/storage/abc", Some("abc"))]
    #[case("/storage/xyz/deep/nested/file.py", Some("xyz"))]
    #[case("/storage/abcd/main.ple", None)]
    #[case("/elsewhere/abc/main.ple", None)]
    #[case("/storage", None)]
    fn test_resource_for(#[case] path: &str, #[case] expected: Option<&str>) {
        let found = folders().resource_for(Path::new(path));
        assert_eq!(found.map(|l| l.id), expected.map(str::to_string));
    }

    #[test]
    fn test_resource_for_reports_root_and_name() {
        let location = folders()
            .resource_for(Path::new("/storage/xyz/a.ple"))
            .unwrap();
        assert_eq!(location.root, PathBuf::from("/storage/xyz"));
        assert_eq!(location.name, "Vectors");
    }

    #[test]
    fn test_first_registered_folder_wins() {
        let mut folders = WorkspaceFolders::new();
        folders.register("/a/outer", "Outer");
        folders.register("/a/outer/inner", "Inner");

        let location = folders
            .resource_for(Path::new("/a/outer/inner/file"))
            .unwrap();
        assert_eq!(location.id, "outer");
    }

    #[test]
    fn test_register_is_idempotent_per_path() {
        let mut folders = folders();
        assert!(!folders.register("/storage/abc", "Renamed"));
        assert_eq!(folders.len(), 2);
        assert_eq!(folders.iter().next().unwrap().name, "Renamed");
    }

    #[test]
    fn test_remove_and_resource_ids() {
        let mut folders = folders();
        assert_eq!(folders.resource_ids(), vec!["abc", "xyz"]);

        assert!(folders.remove(Path::new("/storage/abc")));
        assert!(!folders.remove(Path::new("/storage/abc")));
        assert_eq!(folders.resource_ids(), vec!["xyz"]);
    }

    #[test]
    fn test_remove_under() {
        let mut folders = folders();
        folders.register("/home/me/kept", "Kept");

        assert_eq!(folders.remove_under(Path::new("/storage")), 2);
        assert_eq!(folders.resource_ids(), vec!["kept"]);
    }
}
