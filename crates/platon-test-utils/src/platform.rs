//! In-memory [`PlatformApi`]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use platon_api::{Error, PlatformApi, Result};
use platon_meta::{Resource, User};

#[derive(Debug, Default)]
struct State {
    resources: HashMap<String, Resource>,
    users: HashMap<String, User>,
    /// Real bundle files served on download, by resource id
    bundles: HashMap<String, PathBuf>,
    fail_download: bool,
    fail_upload: bool,
    downloads: Vec<String>,
    uploads: Vec<(String, Vec<u8>)>,
}

/// Platform serving canned resources and users.
///
/// Downloads copy the registered bundle file, or write placeholder bytes
/// when none was registered. Uploads are kept in memory.
#[derive(Debug, Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

fn status(method: &str, url: String, status: u16) -> Error {
    Error::Status {
        method: method.to_string(),
        url,
        status,
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(self, resource: Resource) -> Self {
        self.lock().resources.insert(resource.id.clone(), resource);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.lock().users.insert(user.username.clone(), user);
        self
    }

    /// Serve the file at `bundle` when `id` is downloaded.
    pub fn with_bundle(self, id: &str, bundle: impl Into<PathBuf>) -> Self {
        self.lock().bundles.insert(id.to_string(), bundle.into());
        self
    }

    pub fn failing_download(self) -> Self {
        self.lock().fail_download = true;
        self
    }

    pub fn failing_upload(self) -> Self {
        self.lock().fail_upload = true;
        self
    }

    /// Replace the bundle served for `id`.
    pub fn set_bundle(&self, id: &str, bundle: impl Into<PathBuf>) {
        self.lock().bundles.insert(id.to_string(), bundle.into());
    }

    pub fn downloads(&self) -> Vec<String> {
        self.lock().downloads.clone()
    }

    /// Uploaded bundles as `(resource id, bytes)`, oldest first.
    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.lock().uploads.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn get_resource(&self, id: &str) -> Result<Resource> {
        self.lock()
            .resources
            .get(id)
            .cloned()
            .ok_or_else(|| status("GET", format!("resources/{id}"), 404))
    }

    async fn get_user(&self, username: &str) -> Result<User> {
        self.lock()
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| status("GET", format!("users/{username}"), 404))
    }

    async fn download_bundle(&self, id: &str, dest: &Path) -> Result<()> {
        let source = {
            let mut state = self.lock();
            state.downloads.push(id.to_string());
            if state.fail_download {
                return Err(status("GET", format!("files/{id}/?bundle"), 500));
            }
            state.bundles.get(id).cloned()
        };

        match source {
            Some(path) => {
                tokio::fs::copy(&path, dest).await?;
            }
            None => tokio::fs::write(dest, b"fake bundle").await?,
        }
        Ok(())
    }

    async fn upload_bundle(&self, id: &str, bundle: &Path) -> Result<()> {
        let bytes = tokio::fs::read(bundle).await?;
        let mut state = self.lock();
        if state.fail_upload {
            return Err(status("PUT", format!("files/{id}/"), 500));
        }
        state.uploads.push((id.to_string(), bytes));
        Ok(())
    }
}
