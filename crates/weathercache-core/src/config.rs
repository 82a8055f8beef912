//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the forecast service URL, the last searched city and the
//! request mode.
//!
//! Configuration is stored at `~/.config/weathercache/config.json`. The
//! service URL and cache directory can be overridden from the environment
//! (`WEATHERCACHE_API_URL`, `WEATHERCACHE_CACHE_DIR`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::RequestMode;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "weathercache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Forecast service used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// City searched on first launch
pub const DEFAULT_CITY: &str = "london";

/// Environment variable overriding `base_url`
pub const API_URL_ENV: &str = "WEATHERCACHE_API_URL";

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "WEATHERCACHE_CACHE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub last_city: String,
    pub offline_mode: bool,
    /// Per-request timeout. Unset means requests may take as long as they take.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            last_city: DEFAULT_CITY.to_string(),
            offline_mode: false,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `WEATHERCACHE_API_URL` if it is set.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }

    fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Directory holding the forecast cache (and the log file).
    pub fn cache_dir(&self) -> Result<PathBuf> {
        Self::resolve_cache_dir(std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_cache_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir);
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_mode(&self) -> RequestMode {
        RequestMode::from_offline_flag(self.offline_mode)
    }
}
