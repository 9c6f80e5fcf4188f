//! Bounded in-memory audit trail.
//!
//! Keeps the most recent events up to a fixed capacity; the oldest entry
//! is dropped when a new one arrives at capacity, so memory stays flat no
//! matter how long the process runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, TenantId};
use crate::ports::{AuditEvent, AuditLog};

const DEFAULT_CAPACITY: usize = 1000;

/// Fixed-capacity audit sink.
#[derive(Debug)]
pub struct RingBufferAuditLog {
    capacity: usize,
    events: RwLock<VecDeque<AuditEvent>>,
}

impl RingBufferAuditLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: RwLock::new(VecDeque::new()),
        }
    }

    /// Most recent events for a tenant, oldest first.
    pub async fn events_for(&self, tenant: &TenantId) -> Vec<AuditEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| &e.tenant == tenant)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl Default for RingBufferAuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl AuditLog for RingBufferAuditLog {
    async fn append(&self, event: AuditEvent) -> Result<(), DomainError> {
        let mut events = self.events.write().await;
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AuditKind;

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    fn event(tenant_id: &str, entity: &str) -> AuditEvent {
        AuditEvent::new(
            tenant(tenant_id),
            AuditKind::InstanceCompleted,
            entity,
            None,
            "completed",
        )
    }

    #[tokio::test]
    async fn appends_and_filters_by_tenant() {
        let log = RingBufferAuditLog::new(10);
        log.append(event("family-1", "a")).await.unwrap();
        log.append(event("family-2", "b")).await.unwrap();
        log.append(event("family-1", "c")).await.unwrap();

        let events = log.events_for(&tenant("family-1")).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].entity_id, "a");
        assert_eq!(events[1].entity_id, "c");
    }

    #[tokio::test]
    async fn drops_oldest_at_capacity() {
        let log = RingBufferAuditLog::new(2);
        log.append(event("family-1", "a")).await.unwrap();
        log.append(event("family-1", "b")).await.unwrap();
        log.append(event("family-1", "c")).await.unwrap();

        assert_eq!(log.len().await, 2);
        let events = log.events_for(&tenant("family-1")).await;
        assert_eq!(events[0].entity_id, "b");
        assert_eq!(events[1].entity_id, "c");
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let log = RingBufferAuditLog::new(0);
        log.append(event("family-1", "a")).await.unwrap();
        assert_eq!(log.len().await, 1);
    }
}
