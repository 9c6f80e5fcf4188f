//! ListInstancesHandler - reconcile, then read.
//!
//! Every listing first runs the materializer under the tenant lock, so
//! readers always see exactly one live instance per (template, current
//! cycle) without any background scheduler.

use std::sync::Arc;

use crate::adapters::locking::TenantLockManager;
use crate::application::{MaterializationReport, Materializer};
use crate::domain::foundation::{ActorContext, DomainError};
use crate::domain::instance::Instance;
use crate::ports::InstanceRepository;

/// Result of a reconciling list.
#[derive(Debug, Clone)]
pub struct ListInstancesResult {
    pub instances: Vec<Instance>,
    pub report: MaterializationReport,
}

/// Handler for listing a tenant's instances.
pub struct ListInstancesHandler {
    instances: Arc<dyn InstanceRepository>,
    materializer: Arc<Materializer>,
    locks: Arc<TenantLockManager>,
}

impl ListInstancesHandler {
    pub fn new(
        instances: Arc<dyn InstanceRepository>,
        materializer: Arc<Materializer>,
        locks: Arc<TenantLockManager>,
    ) -> Self {
        Self {
            instances,
            materializer,
            locks,
        }
    }

    /// Any member may list.
    pub async fn handle(&self, ctx: ActorContext) -> Result<ListInstancesResult, DomainError> {
        let _guard = self.locks.acquire(&ctx.tenant).await;

        let report = self.materializer.ensure_instances(&ctx.tenant).await?;
        let instances = self.instances.list(&ctx.tenant).await?;

        Ok(ListInstancesResult { instances, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::RingBufferAuditLog;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::document::{DocumentRepositories, InMemoryDocumentStore};
    use crate::domain::foundation::TemplateId;
    use crate::domain::schedule::{Cadence, Frequency};
    use crate::domain::template::Template;
    use crate::ports::TemplateRepository;
    use chrono::NaiveDate;

    async fn seeded_handler() -> ListInstancesHandler {
        let repos = DocumentRepositories::new(Arc::new(InMemoryDocumentStore::new()));
        let ctx = ActorContext::test_parent();

        let template = Template::new(
            TemplateId::new(),
            "Dishes".to_string(),
            None,
            vec![],
            ctx.actor.clone(),
            10,
            Cadence::simple(Frequency::Daily),
            vec![],
            None,
        )
        .unwrap();
        TemplateRepository::insert(&repos, &ctx.tenant, &template)
            .await
            .unwrap();

        let materializer = Materializer::new(
            Arc::new(repos.clone()),
            Arc::new(repos.clone()),
            Arc::new(RingBufferAuditLog::default()),
            Arc::new(FixedClock::at_date(
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            )),
        );

        ListInstancesHandler::new(
            Arc::new(repos),
            Arc::new(materializer),
            Arc::new(TenantLockManager::new()),
        )
    }

    #[tokio::test]
    async fn listing_materializes_first() {
        let handler = seeded_handler().await;

        let result = handler.handle(ActorContext::test_child("kid-1")).await.unwrap();

        assert_eq!(result.report.created, 1);
        assert_eq!(result.instances.len(), 1);
        assert_eq!(result.instances[0].title(), "Dishes");
    }

    #[tokio::test]
    async fn second_listing_creates_nothing_new() {
        let handler = seeded_handler().await;

        handler.handle(ActorContext::test_parent()).await.unwrap();
        let second = handler.handle(ActorContext::test_parent()).await.unwrap();

        assert_eq!(second.report.created, 0);
        assert_eq!(second.instances.len(), 1);
    }
}
