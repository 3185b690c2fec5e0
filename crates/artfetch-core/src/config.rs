use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::budget::DEFAULT_WORKERS;
use crate::error::FetchError;

/// Settings loaded from `~/.config/artfetch/config.toml`. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtfetchConfig {
    /// Maximum number of artifact downloads in flight at once.
    pub max_concurrent_downloads: usize,
    /// Connection establishment timeout in seconds. Transfers themselves are not time-limited.
    pub connect_timeout_secs: u64,
    /// Access token used when `-a` is not given on the command line.
    pub token: Option<String>,
}

impl Default for ArtfetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: DEFAULT_WORKERS,
            connect_timeout_secs: 30,
            token: None,
        }
    }
}

impl ArtfetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artfetch")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration from disk; defaults when no config file exists.
pub fn load_or_default() -> Result<ArtfetchConfig> {
    match config_path()? {
        Some(path) => load_from_path(&path),
        None => Ok(ArtfetchConfig::default()),
    }
}

pub fn load_from_path(path: &Path) -> Result<ArtfetchConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: ArtfetchConfig = toml::from_str(&data)?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

/// What a run does with the listed artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Print each artifact's download URL; no downloads.
    PrintUrls,
    #[default]
    Download,
}

/// Explicit per-run configuration handed to the locator and the downloader.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub token: String,
    pub output_dir: PathBuf,
    pub mode: RunMode,
    pub workers: usize,
}

impl RunConfig {
    pub fn new(token: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            token: token.into(),
            output_dir: output_dir.into(),
            mode: RunMode::Download,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.token.trim().is_empty() {
            return Err(FetchError::Argument("-a is a required argument".into()));
        }
        if self.workers == 0 {
            return Err(FetchError::Argument("worker count must be at least 1".into()));
        }
        Ok(())
    }
}
