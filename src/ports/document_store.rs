//! Document store port - the persistence collaborator.
//!
//! The store offers only whole-document load/replace per (tenant, key):
//! no partial patch, no row locking. Callers own the read-modify-write
//! cycle. Every document carries a version number; `save` with a stale
//! expected version must fail rather than clobber a concurrent write.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::{DomainError, TenantId};

/// A stored document plus its optimistic-concurrency version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDocument {
    /// Monotonically increasing per (tenant, key), starting at 1.
    pub version: u64,
    pub body: Value,
}

/// Whole-document persistence, namespaced per tenant.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document, or `None` if it was never saved.
    ///
    /// # Errors
    ///
    /// - `StorageError` on backend failure
    async fn load(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<VersionedDocument>, DomainError>;

    /// Replaces the whole document and returns the new version.
    ///
    /// `expected_version` is `None` when the caller believes the document
    /// does not exist yet, `Some(v)` when it loaded version `v`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the stored version does not match the expectation
    /// - `StorageError` on backend failure
    async fn save(
        &self,
        tenant: &TenantId,
        key: &str,
        body: Value,
        expected_version: Option<u64>,
    ) -> Result<u64, DomainError>;
}
