//! Configuration loading and management for faqgen.
//!
//! Loads settings from `faqgen.toml` when present and falls back to defaults
//! otherwise. The data directory can be overridden with `FAQGEN_DATA_DIR`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "faqgen.toml";
const DATA_DIR_ENV: &str = "FAQGEN_DATA_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base path for data storage
    pub path: PathBuf,
}

impl StorageConfig {
    /// Directory holding the sled document store
    pub fn documents_path(&self) -> PathBuf {
        self.path.join("documents")
    }

    /// Directory holding the tantivy index
    pub fn search_index_path(&self) -> PathBuf {
        self.path.join("search_index")
    }
}

/// Limits applied to input before FAQs are generated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Minimum number of characters of (trimmed) text
    pub min_text_length: usize,
    /// Largest accepted file, in bytes
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location (faqgen.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.storage.path = PathBuf::from(dir);
            }
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("faqgen")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_local_dir()
            .map(|dir| dir.join("faqgen"))
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self { path }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "faqgen=warn".to_string(),
        }
    }
}
