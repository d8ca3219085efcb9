//! Settings for the PLaTOn workspace
//!
//! Loaded from `config.toml` in the configuration directory
//! (`$PLATON_CONFIG_DIR`, or the platform config dir joined with `platon`).
//! Every key is optional.
//!
//! # Example TOML
//!
//! ```toml
//! base_url = "https://platon.univ-eiffel.fr/"
//!
//! [api]
//! timeout_secs = 30
//!
//! [git]
//! binary = "/usr/bin/git"
//! author_name = "Jane Doe"
//! author_email = "jane@example.org"
//!
//! [sync]
//! merge_commit = "abort"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use platon_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "PLATON_CONFIG_DIR";
/// Environment variable overriding the storage directory
pub const STORAGE_DIR_ENV: &str = "PLATON_STORAGE_DIR";
/// Name of the settings file inside the configuration directory
pub const SETTINGS_FILE: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "https://platon-preprod.univ-eiffel.fr/";
pub const DEFAULT_DOCS_URL: &str = "https://platon.univ-eiffel.fr/";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Platform root URL, with trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Root of the public documentation site
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub git: GitSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub sync: SyncPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_docs_url() -> String {
    DEFAULT_DOCS_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            docs_url: default_docs_url(),
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
            git: GitSettings::default(),
            auth: AuthSettings::default(),
            sync: SyncPolicy::default(),
        }
    }
}

impl Settings {
    /// Load `config.toml` from `config_dir`, or defaults when it is absent.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(SETTINGS_FILE);
        let mut settings: Settings = ConfigStore::new().load_or_default(&path)?;
        settings.base_url = with_trailing_slash(&settings.base_url);
        settings.docs_url = with_trailing_slash(&settings.docs_url);

        if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://")
        {
            return Err(Error::InvalidConfig {
                path,
                message: format!("base_url must be an http(s) URL, got '{}'", settings.base_url),
            });
        }
        Ok(settings)
    }

    /// Write the settings back to `config_dir/config.toml`.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        ConfigStore::new().save(&config_dir.join(SETTINGS_FILE), self)?;
        Ok(())
    }

    /// Configuration directory: `$PLATON_CONFIG_DIR` or `<config dir>/platon`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|d| d.join("platon"))
            .ok_or(Error::NoPlatformDir { kind: "config" })
    }

    /// Storage area holding the working copies.
    ///
    /// Precedence: `$PLATON_STORAGE_DIR`, `[storage] dir`, `<data dir>/platon/storage`.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.storage.dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("platon").join("storage"))
            .ok_or(Error::NoPlatformDir { kind: "data" })
    }

    /// Root of the REST API: `{base_url}api/v1/`
    pub fn api_url(&self) -> String {
        format!("{}api/v1/", with_trailing_slash(&self.base_url))
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    60
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Version-control binary and commit identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSettings {
    #[serde(default = "default_git_binary")]
    pub binary: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
}

fn default_git_binary() -> PathBuf {
    PathBuf::from("git")
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
            author_name: None,
            author_email: None,
        }
    }
}

/// Values used to build the login redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_uri_scheme")]
    pub uri_scheme: String,
    #[serde(default = "default_extension_id")]
    pub extension_id: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_uri_scheme() -> String {
    "vscode".to_string()
}

fn default_extension_id() -> String {
    "undefined_publisher.platon".to_string()
}

fn default_app_name() -> String {
    "Visual Studio Code".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            uri_scheme: default_uri_scheme(),
            extension_id: default_extension_id(),
            app_name: default_app_name(),
        }
    }
}

/// What a sync does when an intermediate step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record a warning and carry on with the next step
    #[default]
    Continue,
    /// Stop the sync before anything is pushed
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            _ => Err(Error::InvalidValue {
                what: "failure policy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Per-step failure policy applied by the sync sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPolicy {
    /// Committing local edits before pulling
    #[serde(default)]
    pub local_commit: FailurePolicy,
    /// Downloading and merging the remote bundle
    #[serde(default)]
    pub pull: FailurePolicy,
    /// Committing the result of the merge
    #[serde(default)]
    pub merge_commit: FailurePolicy,
}

impl SyncPolicy {
    /// Abort on any intermediate failure.
    pub fn strict() -> Self {
        Self {
            local_commit: FailurePolicy::Abort,
            pull: FailurePolicy::Abort,
            merge_commit: FailurePolicy::Abort,
        }
    }
}
