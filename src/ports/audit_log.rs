//! Audit log port - fire-and-forget activity sink.
//!
//! A failing sink must never fail or roll back the operation that emitted
//! the event; callers log append errors and move on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, MemberId, TenantId, Timestamp};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    TemplateCreated,
    TemplateUpdated,
    TemplateDeleted,
    InstanceMaterialized,
    InstanceExpired,
    InstanceCreated,
    InstanceCompleted,
    InstanceVerified,
    InstanceRejected,
    PointsAwarded,
    PointsSpent,
}

/// One audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub tenant: TenantId,
    pub kind: AuditKind,

    /// The template/instance/transaction the event refers to.
    pub entity_id: String,

    /// Member who triggered the event; absent for scheduler activity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<MemberId>,

    pub message: String,
    pub at: Timestamp,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    pub fn new(
        tenant: TenantId,
        kind: AuditKind,
        entity_id: impl Into<String>,
        actor: Option<MemberId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tenant,
            kind,
            entity_id: entity_id.into(),
            actor,
            message: message.into(),
            at: Timestamp::now(),
        }
    }
}

/// Fire-and-forget audit sink.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends an event. Callers treat failure as non-fatal.
    async fn append(&self, event: AuditEvent) -> Result<(), DomainError>;
}
