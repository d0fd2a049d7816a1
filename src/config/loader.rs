//! Configuration File Loading
//!
//! Finds the configuration file in the usual locations, parses it as TOML or
//! JSON depending on its extension, and validates the result.

use super::{ConfigError, RemoteConfig};
use crate::error::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "REMOTEPANE_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Candidate configuration files, most specific first
    search_paths: Vec<PathBuf>,
    /// File the configuration was loaded from (if any)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Format implied by a file extension; anything but `.json` is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if no file exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a loader over the default search paths
    pub fn new() -> Self {
        Self::with_search_paths(Self::get_search_paths())
    }

    /// Create a loader over explicit candidate files
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<RemoteConfig> {
        Self::new().load_with_options(LoadOptions::default())
    }

    /// Load the first existing candidate file
    pub fn load_with_options(&mut self, options: LoadOptions) -> Result<RemoteConfig> {
        let found = self
            .search_paths
            .iter()
            .find(|path| path.is_file())
            .cloned();

        let config = match found {
            Some(path) => {
                let config = Self::read_config_file(&path)?;
                info!(target: "Remote", "loaded configuration from {}", path.display());
                self.current_path = Some(path);
                config
            }
            None if options.create_default => {
                debug!(target: "Remote", "no configuration file found, using defaults");
                RemoteConfig::default()
            }
            None => return Err(ConfigError::NotFound.into()),
        };

        if options.validate {
            config.validate()?;
        }
        Ok(config)
    }

    /// Load and validate a specific configuration file
    pub fn load_from_path(path: &Path) -> Result<RemoteConfig> {
        let config = Self::read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path, in the format its extension names
    pub fn save_to_path(config: &RemoteConfig, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| serialization_failed(format, e))?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| serialization_failed(format, e))?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    fn read_config_file(path: &Path) -> Result<RemoteConfig> {
        let content = fs::read_to_string(path)?;
        let format = ConfigFormat::from_path(path);

        let config = match format {
            ConfigFormat::Toml => {
                toml::from_str(&content).map_err(|e| parse_failed(format, path, e))?
            }
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_failed(format, path, e))?
            }
        };
        Ok(config)
    }

    /// Get default candidate configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut dirs_to_search = Vec::new();

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            dirs_to_search.push(PathBuf::from(xdg_config).join("remotepane"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            dirs_to_search.push(config_dir.join("remotepane"));
        }
        if let Some(home) = dirs::home_dir() {
            dirs_to_search.push(home.join(".config").join("remotepane"));
        }

        let mut paths = Vec::new();
        if let Some(explicit) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            paths.push(PathBuf::from(explicit));
        }
        for dir in dirs_to_search {
            for name in ["config.toml", "config.json"] {
                let path = dir.join(name);
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }

        paths
    }

    /// Get the file the configuration was loaded from
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all candidate files
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Add a candidate file at the lowest priority
    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_failed(format: ConfigFormat, path: &Path, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::ParseFailed {
        format: format.name().to_string(),
        reason: format!("{}: {}", path.display(), e),
    }
}

fn serialization_failed(format: ConfigFormat, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::SerializationFailed {
        format: format.name().to_string(),
        reason: e.to_string(),
    }
}
