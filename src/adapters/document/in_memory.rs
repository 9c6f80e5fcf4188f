//! In-Memory Document Store Adapter
//!
//! Keeps whole documents in a map with per-document version counters.
//! Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, TenantId};
use crate::ports::{DocumentStore, VersionedDocument};

/// In-memory whole-document store with optimistic versioning.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<(TenantId, String), VersionedDocument>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents (useful for tests).
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Clear all stored data (useful for tests).
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<VersionedDocument>, DomainError> {
        let documents = self.documents.read().await;
        Ok(documents.get(&(tenant.clone(), key.to_string())).cloned())
    }

    async fn save(
        &self,
        tenant: &TenantId,
        key: &str,
        body: Value,
        expected_version: Option<u64>,
    ) -> Result<u64, DomainError> {
        let mut documents = self.documents.write().await;
        let entry_key = (tenant.clone(), key.to_string());
        let current = documents.get(&entry_key).map(|doc| doc.version);

        if current != expected_version {
            return Err(DomainError::conflict(format!(
                "Stale write to document '{}': expected version {:?}, found {:?}",
                key, expected_version, current
            )));
        }

        let version = current.unwrap_or(0) + 1;
        documents.insert(entry_key, VersionedDocument { version, body });
        Ok(version)
    }
}
