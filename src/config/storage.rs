//! Storage configuration

use serde::Deserialize;

use super::ConfigValidationError;

/// Which document store adapter to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-memory store; data is lost on restart. Development only.
    Memory,

    /// JSON files under `data_dir`, one document per (tenant, key).
    File,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend selection
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Base directory for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Memory
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.trim().is_empty() {
            return Err(ConfigValidationError::MissingDataDir);
        }
        Ok(())
    }
}
