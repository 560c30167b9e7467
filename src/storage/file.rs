//! File-backed storage backend
//!
//! Each storage key is persisted as its own `<key>.json` file under a base
//! directory. Writes go through a temp file followed by an atomic rename,
//! so a crash mid-write never leaves a half-written value behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::shared::config::StoreConfig;
use crate::shared::error::AuthError;
use crate::storage::Storage;

/// Directory name used under the platform data dir
const DEFAULT_DIR_NAME: &str = "localauth";

/// File-backed storage
#[derive(Debug)]
pub struct FileStorage {
    /// Base path for stored keys
    base_path: PathBuf,
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStorage {
    /// Create a storage rooted at the platform default data directory
    pub fn new() -> Self {
        let base_path = dirs::data_dir()
            .map(|p| p.join(DEFAULT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME));
        Self::with_base_path(base_path)
    }

    /// Create a storage rooted at a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create a storage from configuration, falling back to the platform
    /// default directory
    pub fn from_config(config: &StoreConfig) -> Self {
        match &config.data_dir {
            Some(dir) => Self::with_base_path(dir.clone()),
            None => Self::new(),
        }
    }

    /// Base path for stored keys
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Ensure the base directory exists
    fn ensure_base_dir(&self) -> Result<(), AuthError> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(())
    }

    /// Get the file path for a storage key
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AuthError> {
        self.ensure_base_dir()?;

        let path = self.key_path(key);
        let temp_path = path.with_extension("json.tmp");

        // Write to temp file first
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AuthError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
