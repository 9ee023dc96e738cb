//! Configuration management for rotlog

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{Level, LineFormat, DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES};

/// Logger configuration
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// level = "warn"
/// file = "/var/log/app/app.log"
/// max_bytes = 1048576
/// backup_count = 5
///
/// [format]
/// microseconds = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Least severe level that produces output (default: info)
    #[serde(default = "default_level")]
    pub level: Level,

    /// Log file path; console only when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Size at which the log file is rotated (default: 10 MiB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Rotated backups to keep; 0 disables rotation (default: 10)
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,

    /// Fields written in front of each message
    #[serde(default)]
    pub format: LineFormat,
}

fn default_level() -> Level {
    Level::Info
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_backup_count() -> usize {
    DEFAULT_BACKUP_COUNT
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            max_bytes: default_max_bytes(),
            backup_count: default_backup_count(),
            format: LineFormat::default(),
        }
    }
}

impl LoggerConfig {
    /// Console-only configuration at `level`
    pub fn console(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Configuration logging to `path` with the default rotation settings
    pub fn with_file(level: Level, path: impl Into<PathBuf>) -> Self {
        Self {
            level,
            file: Some(path.into()),
            ..Self::default()
        }
    }

    /// The log file path, ignoring an empty one
    pub fn file_path(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Read `~/.rotlog/config.toml`, falling back to defaults when it is absent
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

/// Directory holding `config.toml` and the default `logs/` folder
///
/// This is `~/.rotlog`, or `.rotlog` relative to the working directory when
/// no home directory is known.
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("No home directory found, reading rotlog config from ./.rotlog");
        PathBuf::from(".rotlog")
    })
}

/// `~/.rotlog`, or `None` without a home directory
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rotlog"))
}

/// Where [`LoggerConfig::load`] looks for settings
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Suggested log file location (~/.rotlog/logs/rotlog.log)
pub fn default_log_path() -> PathBuf {
    config_dir().join("logs").join("rotlog.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.backup_count, 10);
        assert!(config.file_path().is_none());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let parsed: LoggerConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, LoggerConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let parsed: LoggerConfig = toml::from_str(
            r#"
            level = "warn"
            file = "logs/app.log"
            backup_count = 2

            [format]
            location = false
            "#,
        )
        .unwrap();

        assert_eq!(parsed.level, Level::Warn);
        assert_eq!(parsed.file_path(), Some(Path::new("logs/app.log")));
        assert_eq!(parsed.max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(parsed.backup_count, 2);
        assert!(!parsed.format.location);
        assert!(parsed.format.date);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let result: Result<LoggerConfig, _> = toml::from_str(r#"level = "loud""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_file_path_means_console_only() {
        let config = LoggerConfig::with_file(Level::Info, "");
        assert!(config.file_path().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = LoggerConfig::with_file(Level::Debug, "/tmp/app.log");
        config.max_bytes = 4096;

        config.save_to(&path).unwrap();
        let loaded = LoggerConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = LoggerConfig::load_from(&temp_dir.path().join("missing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_paths_live_under_rotlog_dir() {
        let dir = config_dir();
        assert!(dir.ends_with(".rotlog"));
        assert_eq!(config_file_path(), dir.join("config.toml"));
        if let Some(home_dir) = try_config_dir() {
            assert_eq!(home_dir, dir);
        }
        assert!(default_log_path().ends_with("logs/rotlog.log"));
    }
}
