use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checksum::HashAlgorithm;
use crate::fetch::{HttpOptions, DEFAULT_USER_AGENT};
use crate::repository::{DEFAULT_EXTENSION, DEFAULT_REPOSITORY};

/// Retry policy parameters for primary downloads (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per artifact (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/depload/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploadConfig {
    /// Cache root; relative paths resolve against the working directory.
    pub cache_dir: PathBuf,
    /// Repository used for nodes without a `repo`.
    pub default_repository: String,
    /// Artifact file extension (`jar`).
    pub artifact_extension: String,
    /// `User-Agent` header for every request.
    pub user_agent: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds (None = no limit).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Maximum artifact fetches in flight (None = one task per artifact, unbounded).
    #[serde(default)]
    pub max_concurrent_fetches: Option<usize>,
    /// Sidecar hash algorithm: "md5" (default) or "sha256".
    #[serde(default)]
    pub sidecar_algorithm: HashAlgorithm,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for DeploadConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            default_repository: DEFAULT_REPOSITORY.to_string(),
            artifact_extension: DEFAULT_EXTENSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 30,
            timeout_secs: None,
            max_concurrent_fetches: None,
            sidecar_algorithm: HashAlgorithm::Md5,
            retry: None,
        }
    }
}

impl DeploadConfig {
    /// curl settings for artifact and sidecar requests.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("depload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DeploadConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DeploadConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<DeploadConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: DeploadConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
