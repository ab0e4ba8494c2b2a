//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\album-archiver\config.toml
//! - macOS: ~/Library/Application Support/album-archiver/config.toml
//! - Linux: ~/.config/album-archiver/config.toml
//!
//! A different file can be given with `--config`. The loaded [`Config`] is
//! immutable for the rest of the run and is handed to each component.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::AudioFormat;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library and scanning settings
    pub library: LibraryConfig,

    /// External tagging tool settings
    pub tagger: TaggerConfig,
}

/// Library settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Audio file extensions (without the dot) treated as album content
    pub extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extensions: AudioFormat::ALL
                .iter()
                .map(|f| f.extension().to_string())
                .collect(),
        }
    }
}

/// External tagging tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Run the tagger before identifying each album
    pub enabled: bool,

    /// Program to launch; the album directory is appended as the last argument
    pub program: String,

    /// Extra arguments placed before the album directory
    pub args: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "picard".to_string(),
            args: Vec::new(),
        }
    }
}

impl Config {
    /// Supported formats resolved from `library.extensions`.
    ///
    /// Unknown extensions are skipped with a warning. An empty result falls
    /// back to every supported format.
    pub fn formats(&self) -> Vec<AudioFormat> {
        let mut formats = Vec::new();
        for ext in &self.library.extensions {
            match AudioFormat::from_extension(ext.trim_start_matches('.')) {
                Some(format) if !formats.contains(&format) => formats.push(format),
                Some(_) => {}
                None => tracing::warn!(target: "album_archiver::config", extension = %ext, "Ignoring unsupported extension"),
            }
        }
        if formats.is_empty() {
            formats.extend(AudioFormat::ALL);
        }
        formats
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("album-archiver"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path.
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the given path.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
