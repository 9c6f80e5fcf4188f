//! Transaction log port - the append-only points ledger.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::ledger::PointsTransaction;

/// Append-only persistence contract for points transactions.
///
/// Entries are never updated or deleted.
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Appends one ledger entry.
    async fn append(
        &self,
        tenant: &TenantId,
        transaction: &PointsTransaction,
    ) -> Result<(), DomainError>;

    /// All entries of the tenant, oldest first.
    async fn list(&self, tenant: &TenantId) -> Result<Vec<PointsTransaction>, DomainError>;

    /// Entries for one member, oldest first.
    async fn list_by_member(
        &self,
        tenant: &TenantId,
        member: &MemberId,
    ) -> Result<Vec<PointsTransaction>, DomainError>;
}
