//! Configuration management for sitelens
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::backend::TaskPriority;
use crate::constants::{CONFIG_GENERATED, DEFAULT_TASK_CATEGORY, SUPPORTED_BACKENDS, SUPPORTED_LOG_LEVELS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
    pub backend: BackendConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SeaORM database URL of the project store
    pub database_url: String,
}

/// Photo-task sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Category assigned to tasks created from photo annotations
    pub default_category: String,
    /// Priority used when an annotation task has none
    pub default_priority: TaskPriority,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to file
    pub enabled: bool,
    /// Maximum level written: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

/// Backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend type (currently only "sqlite")
    pub backend_type: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .map(|dir| dir.join("sitelens").join("sitelens.db"))
            .unwrap_or_else(|| PathBuf::from("sitelens.db"));
        Self {
            database_url: format!("sqlite://{}?mode=rwc", path.display()),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_TASK_CATEGORY.to_string(),
            default_priority: TaskPriority::Medium,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: "sqlite".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("sitelens.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("sitelens").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            anyhow::bail!("storage.database_url cannot be empty");
        }
        if !self.storage.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "storage.database_url must be a sqlite URL, got '{}'",
                self.storage.database_url
            );
        }

        if self.sync.default_category.trim().is_empty() {
            anyhow::bail!("sync.default_category cannot be empty");
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !SUPPORTED_LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "logging.level must be one of {}, got '{}'",
                SUPPORTED_LOG_LEVELS.join(", "),
                self.logging.level
            );
        }

        if !SUPPORTED_BACKENDS.contains(&self.backend.backend_type.as_str()) {
            anyhow::bail!(
                "unsupported backend_type '{}'. Available backends: {}",
                self.backend.backend_type,
                SUPPORTED_BACKENDS.join(", ")
            );
        }

        Ok(())
    }

    /// JSON credentials handed to the backend factory
    pub fn backend_credentials(&self) -> String {
        serde_json::json!({ "database_url": self.storage.database_url }).to_string()
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# Sitelens Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(crate::utils::datetime::DUE_DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        log::info!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("sitelens"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
