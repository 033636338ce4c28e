//! Build configuration.
//!
//! ## Learning: Serde Defaults
//!
//! `#[serde(default)]` fills any field missing from the TOML file with
//! the value from `Default::default()`, so a config file only needs to
//! mention what it changes.

use langdb_core::Override;
use langdb_emit::Format;
use langdb_loader::{DialectRule, LoaderOptions, php_rules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one database build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding the definition manifests
    pub definitions_dir: PathBuf,

    /// Generated output file
    pub out_file: PathBuf,

    /// Output format
    pub format: Format,

    /// File extension of definition manifests
    pub manifest_extension: String,

    /// Load and aggregate on worker threads
    pub parallel: bool,

    /// Reject definitions without a name
    pub strict_names: bool,

    /// Derived dialects generated from host definitions
    pub dialects: Vec<DialectRule>,

    /// First-line overrides applied before the built-in ones
    pub overrides: Vec<Override>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from("./syntax"),
            out_file: PathBuf::from("src/hl/language_db_generated.cpp"),
            format: Format::Qmap,
            manifest_extension: "toml".to_string(),
            parallel: false,
            strict_names: false,
            dialects: php_rules(),
            overrides: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path, or returns defaults if there is none.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("langdb").join("config.toml"))
    }

    /// Saves the config to a file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            strict_names: self.strict_names,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
