//! TOML configuration for the quotebook terminal front end.
//!
//! Lookup order: `--config`, `QUOTEBOOK_CONFIG`, then the platform config
//! directory. A missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use quotebook_core::sync::remote::{
    DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_CATEGORY,
    DEFAULT_SYNC_INTERVAL,
};
use quotebook_core::SyncSettings;
use serde::Deserialize;

const CONFIG_ENV: &str = "QUOTEBOOK_CONFIG";
const APP_DIR: &str = "quotebook";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QuotebookConfig {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl QuotebookConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => resolve_config_path(),
        };
        if !path.exists() {
            if explicit.is_some() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("failed to parse TOML from {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    if let Some(base) = dirs::config_dir() {
        return base.join(APP_DIR).join("config.toml");
    }
    PathBuf::from("quotebook.toml")
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|base| base.join(APP_DIR))
        .unwrap_or_else(|| env::temp_dir().join(APP_DIR))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_server_category")]
    pub server_category: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            interval_secs: default_interval_secs(),
            batch_size: default_batch_size(),
            request_timeout_ms: default_request_timeout_ms(),
            server_category: default_server_category(),
        }
    }
}

impl SyncConfig {
    /// Converts to core settings; a zero interval or batch falls back to defaults.
    pub fn to_settings(&self) -> SyncSettings {
        let interval = match self.interval_secs {
            0 => DEFAULT_SYNC_INTERVAL,
            secs => Duration::from_secs(secs),
        };
        let batch_size = match self.batch_size {
            0 => DEFAULT_BATCH_SIZE,
            size => size,
        };
        SyncSettings {
            endpoint: self.endpoint.clone(),
            interval,
            batch_size,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            server_category: self.server_category.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_interval_secs() -> u64 {
    DEFAULT_SYNC_INTERVAL.as_secs()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_request_timeout_ms() -> u64 {
    u64::try_from(DEFAULT_REQUEST_TIMEOUT.as_millis()).unwrap_or(10_000)
}

fn default_server_category() -> String {
    DEFAULT_SERVER_CATEGORY.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the persisted category selection.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    data_dir().join("preferences.sqlite3")
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Must be absolute.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_log_level() -> String {
    quotebook_core::default_log_level().to_string()
}

fn default_log_dir() -> PathBuf {
    data_dir().join("logs")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::QuotebookConfig;
    use std::time::Duration;

    #[test]
    fn empty_document_uses_defaults() {
        let config = QuotebookConfig::from_toml("").unwrap();
        assert!(config.sync.enabled);
        assert_eq!(config.sync.batch_size, 5);
        assert_eq!(config.sync.to_settings().interval, Duration::from_secs(10));
        assert_eq!(config.sync.server_category, "Server");
    }

    #[test]
    fn partial_sections_override_only_given_keys() {
        let config = QuotebookConfig::from_toml(
            r#"
            [sync]
            interval_secs = 30
            endpoint = "http://localhost:8080/posts"

            [storage]
            db_path = "/tmp/qb/prefs.sqlite3"
            "#,
        )
        .unwrap();

        let settings = config.sync.to_settings();
        assert_eq!(settings.interval, Duration::from_secs(30));
        assert_eq!(settings.endpoint, "http://localhost:8080/posts");
        assert_eq!(settings.batch_size, 5);
        assert_eq!(
            config.storage.db_path.to_str(),
            Some("/tmp/qb/prefs.sqlite3")
        );
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let config = QuotebookConfig::from_toml("[sync]\ninterval_secs = 0\nbatch_size = 0").unwrap();
        let settings = config.sync.to_settings();
        assert_eq!(settings.interval, Duration::from_secs(10));
        assert_eq!(settings.batch_size, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(QuotebookConfig::load(Some(&missing)).is_err());
    }
}
