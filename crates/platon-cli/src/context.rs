//! Services shared by the commands
//!
//! Built once per invocation from the settings in the config directory.

use std::path::PathBuf;
use std::sync::Arc;

use platon_api::{ApiConfig, FileSecretStore, PlatonClient, SecretStore};
use platon_core::{SessionStore, Storage, WorkingCopyManager};
use platon_git::{GitCli, Identity};
use platon_meta::Settings;

use crate::error::Result;

/// Credentials file inside the config directory
const CREDENTIALS_FILE: &str = "credentials.json";

pub struct Context {
    pub settings: Settings,
    pub secrets: Arc<dyn SecretStore>,
    pub manager: WorkingCopyManager,
}

impl Context {
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => Settings::config_dir()?,
        };
        let settings = Settings::load(&config_dir)?;
        tracing::debug!(config_dir = %config_dir.display(), base_url = %settings.base_url, "Loaded settings");

        let secrets: Arc<dyn SecretStore> =
            Arc::new(FileSecretStore::new(config_dir.join(CREDENTIALS_FILE)));
        let client = PlatonClient::new(ApiConfig::from_settings(&settings), secrets.clone())?;

        let mut git = GitCli::new(&settings.git.binary);
        if let (Some(name), Some(email)) = (&settings.git.author_name, &settings.git.author_email) {
            git = git.with_identity(Identity {
                name: name.clone(),
                email: email.clone(),
            });
        }

        let manager = WorkingCopyManager::new(
            Arc::new(client),
            Arc::new(git),
            Storage::new(settings.storage_dir()?),
            SessionStore::in_dir(&config_dir),
        )
        .with_policy(settings.sync);

        Ok(Self {
            settings,
            secrets,
            manager,
        })
    }

    pub fn storage(&self) -> &Storage {
        self.manager.storage()
    }
}
