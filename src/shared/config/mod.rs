//! Store configuration module
//!
//! Provides configuration types for embedding applications. Today this
//! only selects where the file-backed storage keeps its data.

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable overriding the default data directory
const DATA_DIR_ENV: &str = "LOCALAUTH_DATA_DIR";

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base directory for the file-backed storage; `None` selects the
    /// platform default
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self { data_dir }
    }
}

impl StoreConfig {
    /// Create a new StoreConfigBuilder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    data_dir: Option<PathBuf>,
}

impl StoreConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidDataDir(
                    "data directory must not be empty".to_string(),
                ));
            }
        }
        Ok(StoreConfig {
            data_dir: self.data_dir,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid data directory: {0}")]
    InvalidDataDir(String),
}
