//! VerifyInstanceHandler - parent approval or rejection of completed work.
//!
//! Approval awards the member recorded in `completed_by`, not the
//! verifying parent - the distinction matters for claimed instances.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::application::AwardService;
use crate::domain::foundation::{ActorContext, DomainError, ErrorCode, InstanceId};
use crate::domain::instance::Instance;
use crate::domain::ledger::PointsTransaction;
use crate::ports::{AuditEvent, AuditKind, AuditLog, Clock, InstanceRepository, SettingsRepository};

/// Command to verify (approve or reject) a completed instance.
#[derive(Debug, Clone)]
pub struct VerifyInstanceCommand {
    pub instance_id: InstanceId,

    /// `true` approves into `Verified`; `false` rejects back to `Pending`.
    pub approve: bool,
}

/// Result of a verification.
#[derive(Debug, Clone)]
pub struct VerifyInstanceResult {
    pub instance: Instance,

    /// Present only on approval with an eligible earner.
    pub transaction: Option<PointsTransaction>,
}

/// Handler for verifying instances.
pub struct VerifyInstanceHandler {
    instances: Arc<dyn InstanceRepository>,
    settings: Arc<dyn SettingsRepository>,
    awards: Arc<AwardService>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl VerifyInstanceHandler {
    pub fn new(
        instances: Arc<dyn InstanceRepository>,
        settings: Arc<dyn SettingsRepository>,
        awards: Arc<AwardService>,
        locks: Arc<TenantLockManager>,
        audit: Arc<dyn AuditLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            instances,
            settings,
            awards,
            locks,
            audit,
            clock,
        }
    }

    /// # Errors
    ///
    /// - `Forbidden` if the actor is not a parent
    /// - `InstanceNotFound` if the instance doesn't exist
    /// - `Conflict` if the instance is not completed
    pub async fn handle(
        &self,
        cmd: VerifyInstanceCommand,
        ctx: ActorContext,
    ) -> Result<VerifyInstanceResult, DomainError> {
        ctx.require_parent()?;

        let _guard = self.locks.acquire(&ctx.tenant).await;

        let mut instance = self
            .instances
            .find_by_id(&ctx.tenant, &cmd.instance_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InstanceNotFound, "Instance not found")
                    .with_detail("instance_id", cmd.instance_id.to_string())
            })?;

        let mut transaction = None;
        if cmd.approve {
            instance.approve(ctx.actor.clone(), self.clock.now())?;
            let settings = self.settings.get(&ctx.tenant).await?;
            transaction = self.awards.award(&ctx.tenant, &mut instance, &settings).await?;
        } else {
            instance.reject()?;
        }

        // An award has already persisted the flagged instance.
        if transaction.is_none() {
            self.instances.update(&ctx.tenant, &instance).await?;
        }

        let (kind, message) = if cmd.approve {
            (
                AuditKind::InstanceVerified,
                format!("Verified '{}'", instance.title()),
            )
        } else {
            (
                AuditKind::InstanceRejected,
                format!("Rejected '{}' back to pending", instance.title()),
            )
        };
        let event = AuditEvent::new(
            ctx.tenant.clone(),
            kind,
            instance.id().to_string(),
            Some(ctx.actor),
            message,
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(VerifyInstanceResult {
            instance,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::RingBufferAuditLog;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::document::{DocumentRepositories, InMemoryDocumentStore};
    use crate::domain::foundation::{DueDate, MemberId, Role, Timestamp};
    use crate::domain::instance::InstanceStatus;
    use crate::domain::member::Member;
    use crate::ports::{MemberRepository, TransactionLog};
    use chrono::NaiveDate;

    struct Fixture {
        handler: VerifyInstanceHandler,
        repos: DocumentRepositories,
    }

    async fn fixture() -> Fixture {
        let repos = DocumentRepositories::new(Arc::new(InMemoryDocumentStore::new()));
        let ctx = ActorContext::test_parent();

        let member = Member::new(
            MemberId::new("kid-1").unwrap(),
            "Sam".to_string(),
            Role::Child,
        )
        .unwrap();
        MemberRepository::insert(&repos, &ctx.tenant, &member)
            .await
            .unwrap();

        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        ));
        let audit: Arc<RingBufferAuditLog> = Arc::new(RingBufferAuditLog::default());
        let awards = Arc::new(AwardService::new(
            Arc::new(repos.clone()),
            Arc::new(repos.clone()),
            Arc::new(repos.clone()),
            audit.clone(),
            clock.clone(),
        ));
        let handler = VerifyInstanceHandler::new(
            Arc::new(repos.clone()),
            Arc::new(repos.clone()),
            awards,
            Arc::new(TenantLockManager::new()),
            audit,
            clock,
        );
        Fixture { handler, repos }
    }

    /// Seeds an instance already completed by kid-1.
    async fn seed_completed(fixture: &Fixture) -> Instance {
        let ctx = ActorContext::test_parent();
        let mut instance = Instance::one_off(
            InstanceId::new(),
            "Wash car".to_string(),
            None,
            vec![],
            vec![],
            DueDate::from_ymd(2024, 3, 5).unwrap(),
            10,
        )
        .unwrap();
        instance
            .complete(
                &MemberId::new("kid-1").unwrap(),
                Some("proof".to_string()),
                Timestamp::now(),
            )
            .unwrap();
        InstanceRepository::insert(&fixture.repos, &ctx.tenant, &instance)
            .await
            .unwrap();
        instance
    }

    #[tokio::test]
    async fn approval_verifies_and_awards_the_completer() {
        let fixture = fixture().await;
        let instance = seed_completed(&fixture).await;
        let ctx = ActorContext::test_parent();

        let result = fixture
            .handler
            .handle(
                VerifyInstanceCommand {
                    instance_id: *instance.id(),
                    approve: true,
                },
                ctx.clone(),
            )
            .await
            .unwrap();

        assert_eq!(result.instance.status(), InstanceStatus::Verified);
        assert_eq!(result.instance.verified_by(), Some(&ctx.actor));

        // The claimant earns, not the verifying parent.
        let tx = result.transaction.unwrap();
        assert_eq!(tx.member_id(), &MemberId::new("kid-1").unwrap());
        assert_eq!(tx.amount(), 10);

        let member =
            MemberRepository::find_by_id(&fixture.repos, &ctx.tenant, &MemberId::new("kid-1").unwrap())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(member.balance(), 10);
    }

    #[tokio::test]
    async fn rejection_resets_to_pending_without_award() {
        let fixture = fixture().await;
        let instance = seed_completed(&fixture).await;
        let ctx = ActorContext::test_parent();

        let result = fixture
            .handler
            .handle(
                VerifyInstanceCommand {
                    instance_id: *instance.id(),
                    approve: false,
                },
                ctx.clone(),
            )
            .await
            .unwrap();

        assert_eq!(result.instance.status(), InstanceStatus::Pending);
        assert!(result.instance.completed_by().is_none());
        assert!(result.instance.photo_proof().is_none());
        assert!(result.transaction.is_none());

        assert!(TransactionLog::list(&fixture.repos, &ctx.tenant)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn verifying_twice_conflicts_and_awards_once() {
        let fixture = fixture().await;
        let instance = seed_completed(&fixture).await;
        let ctx = ActorContext::test_parent();
        let cmd = VerifyInstanceCommand {
            instance_id: *instance.id(),
            approve: true,
        };

        fixture.handler.handle(cmd.clone(), ctx.clone()).await.unwrap();
        let err = fixture.handler.handle(cmd, ctx.clone()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(
            TransactionLog::list(&fixture.repos, &ctx.tenant)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn child_is_forbidden() {
        let fixture = fixture().await;
        let instance = seed_completed(&fixture).await;

        let err = fixture
            .handler
            .handle(
                VerifyInstanceCommand {
                    instance_id: *instance.id(),
                    approve: true,
                },
                ActorContext::test_child("kid-1"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    /// Instance repository whose first update fails, as an interrupted
    /// write would.
    struct FlakyInstances {
        inner: DocumentRepositories,
        failed_once: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl InstanceRepository for FlakyInstances {
        async fn list(
            &self,
            tenant: &crate::domain::foundation::TenantId,
        ) -> Result<Vec<Instance>, DomainError> {
            InstanceRepository::list(&self.inner, tenant).await
        }

        async fn list_by_template(
            &self,
            tenant: &crate::domain::foundation::TenantId,
            template_id: &crate::domain::foundation::TemplateId,
        ) -> Result<Vec<Instance>, DomainError> {
            self.inner.list_by_template(tenant, template_id).await
        }

        async fn find_by_id(
            &self,
            tenant: &crate::domain::foundation::TenantId,
            id: &InstanceId,
        ) -> Result<Option<Instance>, DomainError> {
            InstanceRepository::find_by_id(&self.inner, tenant, id).await
        }

        async fn insert(
            &self,
            tenant: &crate::domain::foundation::TenantId,
            instance: &Instance,
        ) -> Result<(), DomainError> {
            InstanceRepository::insert(&self.inner, tenant, instance).await
        }

        async fn update(
            &self,
            tenant: &crate::domain::foundation::TenantId,
            instance: &Instance,
        ) -> Result<(), DomainError> {
            if !self
                .failed_once
                .swap(true, std::sync::atomic::Ordering::SeqCst)
            {
                return Err(DomainError::storage("instance write failed"));
            }
            InstanceRepository::update(&self.inner, tenant, instance).await
        }

        async fn delete(
            &self,
            tenant: &crate::domain::foundation::TenantId,
            id: &InstanceId,
        ) -> Result<(), DomainError> {
            InstanceRepository::delete(&self.inner, tenant, id).await
        }

        async fn delete_by_template(
            &self,
            tenant: &crate::domain::foundation::TenantId,
            template_id: &crate::domain::foundation::TemplateId,
        ) -> Result<usize, DomainError> {
            self.inner.delete_by_template(tenant, template_id).await
        }
    }

    #[tokio::test]
    async fn interrupted_approval_cannot_credit_twice() {
        let repos = DocumentRepositories::new(Arc::new(InMemoryDocumentStore::new()));
        let ctx = ActorContext::test_parent();

        let member = Member::new(
            MemberId::new("kid-1").unwrap(),
            "Sam".to_string(),
            Role::Child,
        )
        .unwrap();
        MemberRepository::insert(&repos, &ctx.tenant, &member)
            .await
            .unwrap();

        let mut instance = Instance::one_off(
            InstanceId::new(),
            "Wash car".to_string(),
            None,
            vec![],
            vec![],
            DueDate::from_ymd(2024, 3, 5).unwrap(),
            10,
        )
        .unwrap();
        instance
            .complete(&MemberId::new("kid-1").unwrap(), None, Timestamp::now())
            .unwrap();
        InstanceRepository::insert(&repos, &ctx.tenant, &instance)
            .await
            .unwrap();

        let flaky = Arc::new(FlakyInstances {
            inner: repos.clone(),
            failed_once: std::sync::atomic::AtomicBool::new(false),
        });
        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        ));
        let audit: Arc<RingBufferAuditLog> = Arc::new(RingBufferAuditLog::default());
        let awards = Arc::new(AwardService::new(
            flaky.clone(),
            Arc::new(repos.clone()),
            Arc::new(repos.clone()),
            audit.clone(),
            clock.clone(),
        ));
        let handler = VerifyInstanceHandler::new(
            flaky,
            Arc::new(repos.clone()),
            awards,
            Arc::new(TenantLockManager::new()),
            audit,
            clock,
        );
        let cmd = VerifyInstanceCommand {
            instance_id: *instance.id(),
            approve: true,
        };

        // The interrupted attempt leaves the member uncredited and the
        // ledger empty: the flag write comes first and it failed.
        let err = handler.handle(cmd.clone(), ctx.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(TransactionLog::list(&repos, &ctx.tenant)
            .await
            .unwrap()
            .is_empty());

        // Retrying credits exactly once.
        let result = handler.handle(cmd, ctx.clone()).await.unwrap();
        assert_eq!(result.transaction.unwrap().amount(), 10);

        let member =
            MemberRepository::find_by_id(&repos, &ctx.tenant, &MemberId::new("kid-1").unwrap())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(member.balance(), 10);
        assert_eq!(
            TransactionLog::list(&repos, &ctx.tenant)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn verifying_a_pending_instance_conflicts() {
        let fixture = fixture().await;
        let ctx = ActorContext::test_parent();
        let instance = Instance::one_off(
            InstanceId::new(),
            "Wash car".to_string(),
            None,
            vec![],
            vec![],
            DueDate::from_ymd(2024, 3, 5).unwrap(),
            10,
        )
        .unwrap();
        InstanceRepository::insert(&fixture.repos, &ctx.tenant, &instance)
            .await
            .unwrap();

        let err = fixture
            .handler
            .handle(
                VerifyInstanceCommand {
                    instance_id: *instance.id(),
                    approve: true,
                },
                ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }
}
