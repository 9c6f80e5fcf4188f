//! Actor context flowing through command handlers.
//!
//! The identity collaborator verifies credentials upstream and supplies
//! `(actor, role, tenant)` per request; the core trusts these values
//! without re-verifying them.

use serde::{Deserialize, Serialize};

use super::{DomainError, ErrorCode, MemberId, Role, TenantId};

/// Verified caller context passed to every command handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The member executing this command.
    pub actor: MemberId,

    /// The actor's role within the tenant.
    pub role: Role,

    /// The tenant whose data this request may touch.
    pub tenant: TenantId,
}

impl ActorContext {
    /// Creates a new actor context.
    pub fn new(actor: MemberId, role: Role, tenant: TenantId) -> Self {
        Self { actor, role, tenant }
    }

    /// Requires the parent role.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor is not a parent
    pub fn require_parent(&self) -> Result<(), DomainError> {
        if self.role.is_parent() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "This operation requires the parent role",
            )
            .with_detail("actor", self.actor.to_string()))
        }
    }
}

#[cfg(test)]
impl ActorContext {
    /// Test fixture: a parent in the "test-tenant" group.
    pub fn test_parent() -> Self {
        Self::new(
            MemberId::new("parent-1").unwrap(),
            Role::Parent,
            TenantId::new("test-tenant").unwrap(),
        )
    }

    /// Test fixture: a child in the "test-tenant" group.
    pub fn test_child(id: &str) -> Self {
        Self::new(
            MemberId::new(id).unwrap(),
            Role::Child,
            TenantId::new("test-tenant").unwrap(),
        )
    }
}
