//! Configuration management for the application.
//!
//! Settings come from an optional TOML file; command-line flags and
//! environment variables (`PORT`, `DEBUG`, ...) override individual values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_TITLE, DEFAULT_PORT};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Verbose logging
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

/// Location of the data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory containing both data files
    pub dir: PathBuf,
    /// Readings file name, relative to `dir`
    pub readings_file: String,
    /// Axis definitions file name, relative to `dir`
    pub axes_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            readings_file: "readings_data.json".to_string(),
            axes_file: "axis_definitions.json".to_string(),
        }
    }
}

impl DataConfig {
    /// Full path of the readings file.
    #[must_use]
    pub fn readings_path(&self) -> PathBuf {
        self.dir.join(&self.readings_file)
    }

    /// Full path of the axis definitions file.
    #[must_use]
    pub fn axes_path(&self) -> PathBuf {
        self.dir.join(&self.axes_file)
    }
}

/// Page presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Page heading and browser title
    pub title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: APP_TITLE.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Data file locations
    pub data: DataConfig,
    /// Page presentation
    pub ui: UiConfig,
}

/// Values given on the command line or through the environment.
///
/// `None` (or `false` for `debug`) leaves the configured value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Interface to bind
    pub host: Option<String>,
    /// Port to listen on
    pub port: Option<u16>,
    /// Data directory
    pub data_dir: Option<PathBuf>,
    /// Force verbose logging
    pub debug: bool,
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parses configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise uses the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line/environment overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(dir) = overrides.data_dir {
            self.data.dir = dir;
        }
        self.server.debug |= overrides.debug;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }
        if self.data.readings_file.trim().is_empty() || self.data.axes_file.trim().is_empty() {
            anyhow::bail!("data.readings_file and data.axes_file cannot be empty");
        }
        Ok(())
    }
}
