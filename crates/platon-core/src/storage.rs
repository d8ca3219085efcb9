//! On-disk layout of the storage area
//!
//! ```text
//! <storage>/
//!   <id>/              working copy of resource <id>
//!   <id>.bundle.git    transient bundle, downloaded or about to be uploaded
//!   .<id>.lock         held while <id> is acquired or synced
//!   previews/<id>.html preview documents
//! ```

use std::path::{Component, Path, PathBuf};

use platon_fs::io;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject ids that would not name a single entry of the storage root.
    ///
    /// Every path of the layout is derived from the id, so `..`, separators
    /// or an absolute id would put a working copy outside the storage area.
    pub fn check_id(&self, id: &str) -> Result<()> {
        let mut components = Path::new(id).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if id.is_empty() || !single || id.contains(['/', '\\']) {
            return Err(Error::InvalidResourceId { id: id.to_string() });
        }
        Ok(())
    }

    /// Working copy directory of `id`.
    pub fn copy_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    pub fn bundle_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.bundle.git"))
    }

    pub fn lock_path(&self, id: &str) -> PathBuf {
        self.root.join(format!(".{id}.lock"))
    }

    pub fn previews_dir(&self) -> PathBuf {
        self.root.join("previews")
    }

    /// Create the storage root if it does not exist.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| platon_fs::Error::io(&self.root, e))?;
        Ok(())
    }

    /// Delete every working copy and leave an empty storage root.
    pub fn wipe(&self) -> Result<()> {
        tracing::info!(root = %self.root.display(), "Wiping storage area");
        io::recreate_dir(&self.root)?;
        Ok(())
    }

    /// Remove a transient bundle, logging instead of failing.
    pub(crate) fn discard_bundle(&self, bundle: &Path) {
        match io::remove_if_exists(bundle) {
            Ok(true) => tracing::debug!(path = %bundle.display(), "Removed bundle"),
            Ok(false) => {}
            Err(e) => tracing::warn!(path = %bundle.display(), error = %e, "Failed to remove bundle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let storage = Storage::new("/data/platon");
        assert_eq!(storage.copy_dir("abc"), PathBuf::from("/data/platon/abc"));
        assert_eq!(
            storage.bundle_path("abc"),
            PathBuf::from("/data/platon/abc.bundle.git")
        );
        assert_eq!(storage.lock_path("abc"), PathBuf::from("/data/platon/.abc.lock"));
        assert_eq!(storage.previews_dir(), PathBuf::from("/data/platon/previews"));
    }

    #[rstest]
    #[case("abc")]
    #[case("01234567-89ab-cdef-aaaa-0123456789ab")]
    #[case("name with spaces")]
    fn test_check_id_accepts_plain_names(#[case] id: &str) {
        assert!(Storage::new("/data/platon").check_id(id).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case(".")]
    #[case("../escape")]
    #[case("/abs")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("abc/")]
    fn test_check_id_rejects_paths(#[case] id: &str) {
        assert!(matches!(
            Storage::new("/data/platon").check_id(id),
            Err(Error::InvalidResourceId { .. })
        ));
    }

    #[test]
    fn test_wipe_leaves_empty_root() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("storage"));
        std::fs::create_dir_all(storage.copy_dir("abc")).unwrap();
        std::fs::write(storage.copy_dir("abc").join("main.ple"), "x").unwrap();

        storage.wipe().unwrap();

        assert!(storage.root().is_dir());
        assert_eq!(std::fs::read_dir(storage.root()).unwrap().count(), 0);
    }
}
