use serde::{Deserialize, Serialize};

use std::future::Future;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::QuireError;

/// Public bucket the media endpoint writes uploaded files into.
pub const DEFAULT_STORAGE_BASE_URL: &str =
    "https://mohajistudio-developers.s3.ap-northeast-2.amazonaws.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the blog API.
    pub endpoint: String,
    /// Base URL that stored media file names are resolved against.
    pub storage_base_url: String,
    /// Bearer token attached to API requests, if any.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds. `0` disables the timeout.
    pub timeout_secs: u64,
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self, QuireError> {
        loader.load().await
    }

    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<(), QuireError> {
        saver.save(self).await
    }

    /// Apply `QUIRE_API_URL`, `QUIRE_STORAGE_URL` and `QUIRE_ACCESS_TOKEN` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(endpoint) = lookup("QUIRE_API_URL") {
            self.endpoint = endpoint;
        }
        if let Some(storage) = lookup("QUIRE_STORAGE_URL") {
            self.storage_base_url = storage;
        }
        if let Some(token) = lookup("QUIRE_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        self
    }

    /// Request timeout, or `None` when `timeout_secs` is 0.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_owned(),
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_owned(),
            access_token: None,
            timeout_secs: 60,
        }
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(&self) -> impl Future<Output = Result<Config, QuireError>> + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    /// Saves the configuration data.
    fn save(&self, config: &Config) -> impl Future<Output = Result<(), QuireError>> + Send;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// The format follows the file extension: `.json` or `.toml`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }
}

impl Loader for FileStore {
    async fn load(&self) -> Result<Config, QuireError> {
        let raw = std::fs::read_to_string(&self.path)?;
        match self.extension() {
            Some("json") => Ok(serde_json::from_str(&raw)?),
            Some("toml") => toml::from_str(&raw).map_err(|e| QuireError::Config(e.to_string())),
            _ => Err(unsupported(&self.path)),
        }
    }
}

impl Saver for FileStore {
    async fn save(&self, config: &Config) -> Result<(), QuireError> {
        let raw = match self.extension() {
            Some("json") => serde_json::to_string_pretty(config)?,
            Some("toml") => {
                toml::to_string_pretty(config).map_err(|e| QuireError::Config(e.to_string()))?
            }
            _ => return Err(unsupported(&self.path)),
        };
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

fn unsupported(path: &Path) -> QuireError {
    QuireError::Config(format!("unsupported file format: {}", path.display()))
}
