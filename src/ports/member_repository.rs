//! Member repository port.
//!
//! Members are created by an external collaborator; the core mostly reads
//! them and writes back balance/stat mutations.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::member::Member;

/// Persistence contract for group members.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// All members of the tenant.
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Member>, DomainError>;

    /// Finds a member by ID, `None` if absent.
    async fn find_by_id(
        &self,
        tenant: &TenantId,
        id: &MemberId,
    ) -> Result<Option<Member>, DomainError>;

    /// Stores a new member.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the ID already exists
    async fn insert(&self, tenant: &TenantId, member: &Member) -> Result<(), DomainError>;

    /// Replaces an existing member (balance/stat updates).
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member doesn't exist
    async fn update(&self, tenant: &TenantId, member: &Member) -> Result<(), DomainError>;
}
