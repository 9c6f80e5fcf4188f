//! JSON File Document Store Adapter
//!
//! Stores each (tenant, key) document as one JSON file under a base
//! directory, version embedded in the file. Writes go to a temp file
//! first and are renamed into place so a crash never leaves a partial
//! document.
//!
//! # Directory Structure
//!
//! ```text
//! {base_path}/
//! ├── tenant_family-1/
//! │   ├── templates.json
//! │   └── instances.json
//! └── tenant_family-2/
//!     └── members.json
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, TenantId};
use crate::ports::{DocumentStore, VersionedDocument};

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    version: u64,
    body: Value,
}

/// Single-node durable document store backed by JSON files.
#[derive(Debug)]
pub struct JsonFileDocumentStore {
    base_path: PathBuf,

    /// Serializes the check-version-then-rename sequence.
    write_lock: Mutex<()>,
}

impl JsonFileDocumentStore {
    /// Creates a store rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn tenant_dir(&self, tenant: &TenantId) -> PathBuf {
        self.base_path.join(format!("tenant_{}", tenant.as_str()))
    }

    fn document_path(&self, tenant: &TenantId, key: &str) -> PathBuf {
        self.tenant_dir(tenant).join(format!("{}.json", key))
    }

    fn temp_path(&self, tenant: &TenantId, key: &str) -> PathBuf {
        self.tenant_dir(tenant).join(format!("{}.json.tmp", key))
    }

    async fn read_document(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<StoredDocument>, DomainError> {
        let path = self.document_path(tenant, key);
        match fs::read(&path).await {
            Ok(bytes) => {
                let stored: StoredDocument = serde_json::from_slice(&bytes).map_err(|e| {
                    DomainError::storage(format!(
                        "Corrupt document file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Some(stored))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn load(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<VersionedDocument>, DomainError> {
        Ok(self.read_document(tenant, key).await?.map(|stored| {
            VersionedDocument {
                version: stored.version,
                body: stored.body,
            }
        }))
    }

    async fn save(
        &self,
        tenant: &TenantId,
        key: &str,
        body: Value,
        expected_version: Option<u64>,
    ) -> Result<u64, DomainError> {
        let _guard = self.write_lock.lock().await;

        let current = self.read_document(tenant, key).await?.map(|d| d.version);
        if current != expected_version {
            return Err(DomainError::conflict(format!(
                "Stale write to document '{}': expected version {:?}, found {:?}",
                key, expected_version, current
            )));
        }

        let version = current.unwrap_or(0) + 1;
        let stored = StoredDocument { version, body };
        let bytes = serde_json::to_vec_pretty(&stored)
            .map_err(|e| DomainError::storage(format!("Failed to encode document: {}", e)))?;

        let dir = self.tenant_dir(tenant);
        fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let temp = self.temp_path(tenant, key);
        let path = self.document_path(tenant, key);
        fs::write(&temp, &bytes).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", temp.display(), e))
        })?;
        fs::rename(&temp, &path).await.map_err(|e| {
            DomainError::storage(format!("Failed to rename {}: {}", path.display(), e))
        })?;

        Ok(version)
    }
}
