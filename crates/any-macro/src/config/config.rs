//! Configuration management.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, Result,
    config::{PlaybackConfig, RecordingConfig, StorageConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use crate::config::{DEFAULT_COMMAND_LATENCY_MS, DEFAULT_CONSECUTIVE_BLOCK};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Recording behaviour settings.
    pub recording: RecordingConfig,
    /// Playback behaviour settings.
    pub playback: PlaybackConfig,
    /// Macro library storage settings.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// `path` overrides the platform config location; the override must
    /// exist, since a typo'd path silently replaced by defaults is worse
    /// than an error.
    #[track_caller]
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::ConfigError {
                        reason: format!("Config file not found: {}", path.display()),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                path.to_path_buf()
            }
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                    reason: format!("Failed to read config: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Resolve the macro library path, falling back to the platform data
    /// directory when no path is configured.
    #[track_caller]
    pub fn macros_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.macros_path {
            return Ok(path.clone());
        }

        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.data_dir().join("macros.json"))
    }

    #[track_caller]
    fn config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "any-macro", "AnyMacro").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn create_default() -> Result<Self> {
        let config = Config {
            recording: RecordingConfig {
                consecutive_block: DEFAULT_CONSECUTIVE_BLOCK,
            },
            playback: PlaybackConfig {
                command_latency_ms: DEFAULT_COMMAND_LATENCY_MS,
            },
            storage: StorageConfig { macros_path: None },
        };

        config.save()?;

        Ok(config)
    }
}
