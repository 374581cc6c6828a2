//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API key, an optional base URL override, the request timeout, and
//! whether to stay offline.
//!
//! Configuration is stored at `~/.config/trendcache/config.json`. The API
//! key and base URL can also come from `TMDB_API_KEY` / `TMDB_BASE_URL`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "trendcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "TMDB_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub offline_mode: bool,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Let the environment override the API key and base URL.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_key: Option<String>, base_url: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = Some(url.trim().to_string());
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured. Set {} or add \"api_key\" to {}",
                    API_KEY_ENV,
                    CONFIG_FILE
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.api_key().is_err());
        assert_eq!(config.base_url(), "https://api.themoviedb.org/3");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.offline_mode);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_key: Some("abc123".to_string()),
            base_url: None,
            offline_mode: true,
            request_timeout_secs: Some(5),
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.api_key().unwrap(), "abc123");
        assert!(loaded.offline_mode);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.api_key.is_none());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_key": "k"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key().unwrap(), "k");
        assert!(!loaded.offline_mode);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };

        config.apply_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api_key().unwrap(), "from-file");

        config.apply_overrides(Some("from-env".to_string()), Some("http://localhost:8080".to_string()));
        assert_eq!(config.api_key().unwrap(), "from-env");
        assert_eq!(config.base_url(), "http://localhost:8080");
    }
}
