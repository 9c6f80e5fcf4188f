//! Audit sink that emits events as structured log lines.

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::ports::{AuditEvent, AuditLog};

/// Writes audit events to the tracing subscriber. Infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl TracingAuditLog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn append(&self, event: AuditEvent) -> Result<(), DomainError> {
        info!(
            tenant = %event.tenant,
            kind = ?event.kind,
            entity_id = %event.entity_id,
            actor = event.actor.as_ref().map(|a| a.to_string()),
            "{}",
            event.message
        );
        Ok(())
    }
}
