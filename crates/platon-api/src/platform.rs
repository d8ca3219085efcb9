//! The platform calls the rest of the workspace depends on

use std::path::Path;

use async_trait::async_trait;
use platon_meta::{ApiEnvelope, Resource, User};

use crate::Result;
use crate::client::PlatonClient;

/// Form field carrying the uploaded bundle
pub const BUNDLE_FIELD: &str = "bundle";
/// File name announced for the uploaded bundle
pub const BUNDLE_FILE_NAME: &str = "bundle.git";

/// Remote operations used by the working copy manager and the auth flow.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// `GET resources/{id}?expands=parent`
    async fn get_resource(&self, id: &str) -> Result<Resource>;

    /// `GET users/{username}`
    async fn get_user(&self, username: &str) -> Result<User>;

    /// `GET files/{id}/?bundle`, streamed into `dest`
    async fn download_bundle(&self, id: &str, dest: &Path) -> Result<()>;

    /// `PUT files/{id}/` with the bundle as multipart field `bundle`
    async fn upload_bundle(&self, id: &str, bundle: &Path) -> Result<()>;
}

#[async_trait]
impl PlatformApi for PlatonClient {
    async fn get_resource(&self, id: &str) -> Result<Resource> {
        let envelope: ApiEnvelope<Resource> =
            self.get(&format!("resources/{id}?expands=parent")).await?;
        Ok(envelope.into_inner())
    }

    async fn get_user(&self, username: &str) -> Result<User> {
        let envelope: ApiEnvelope<User> = self.get(&format!("users/{username}")).await?;
        Ok(envelope.into_inner())
    }

    async fn download_bundle(&self, id: &str, dest: &Path) -> Result<()> {
        self.download(&format!("files/{id}/?bundle"), dest).await?;
        Ok(())
    }

    async fn upload_bundle(&self, id: &str, bundle: &Path) -> Result<()> {
        let bytes = tokio::fs::read(bundle).await?;
        self.put_file(&format!("files/{id}/"), BUNDLE_FIELD, BUNDLE_FILE_NAME, bytes)
            .await
    }
}
