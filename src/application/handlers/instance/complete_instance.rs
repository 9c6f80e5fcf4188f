//! CompleteInstanceHandler - marks an instance done.
//!
//! With the tenant's auto-approve setting on, completion continues
//! straight to `Verified` (verifier "system") and the award runs here;
//! otherwise the instance waits for explicit verification.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::application::AwardService;
use crate::domain::foundation::{
    ActorContext, DomainError, ErrorCode, InstanceId, MemberId,
};
use crate::domain::instance::Instance;
use crate::domain::ledger::PointsTransaction;
use crate::ports::{AuditEvent, AuditKind, AuditLog, Clock, InstanceRepository, SettingsRepository};

/// Command to complete an instance.
#[derive(Debug, Clone)]
pub struct CompleteInstanceCommand {
    pub instance_id: InstanceId,

    /// Opaque reference to uploaded photo proof, if any.
    pub photo_proof: Option<String>,
}

/// Result of a completion.
#[derive(Debug, Clone)]
pub struct CompleteInstanceResult {
    pub instance: Instance,

    /// Present only when auto-approve awarded points.
    pub transaction: Option<PointsTransaction>,
}

/// Handler for completing instances.
pub struct CompleteInstanceHandler {
    instances: Arc<dyn InstanceRepository>,
    settings: Arc<dyn SettingsRepository>,
    awards: Arc<AwardService>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl CompleteInstanceHandler {
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
    /// - `InstanceNotFound` if the instance doesn't exist
    /// - `Conflict` if the instance is not pending
    /// - `Unauthorized` if the actor is not an assignee of an assigned
    ///   instance
    /// - `SubtasksIncomplete` if any subtask is unfinished
    pub async fn handle(
        &self,
        cmd: CompleteInstanceCommand,
        ctx: ActorContext,
    ) -> Result<CompleteInstanceResult, DomainError> {
        let _guard = self.locks.acquire(&ctx.tenant).await;

        let mut instance = self
            .instances
            .find_by_id(&ctx.tenant, &cmd.instance_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InstanceNotFound, "Instance not found")
                    .with_detail("instance_id", cmd.instance_id.to_string())
            })?;

        instance.complete(&ctx.actor, cmd.photo_proof, self.clock.now())?;

        let settings = self.settings.get(&ctx.tenant).await?;
        let mut transaction = None;
        if settings.auto_approve {
            instance.approve(MemberId::system(), self.clock.now())?;
            transaction = self.awards.award(&ctx.tenant, &mut instance, &settings).await?;
        }

        // An award has already persisted the flagged instance.
        if transaction.is_none() {
            self.instances.update(&ctx.tenant, &instance).await?;
        }

        self.audit_completed(&ctx, &instance, settings.auto_approve).await;

        Ok(CompleteInstanceResult {
            instance,
            transaction,
        })
    }

    async fn audit_completed(&self, ctx: &ActorContext, instance: &Instance, auto: bool) {
        let message = if auto {
            format!("Completed and auto-verified '{}'", instance.title())
        } else {
            format!("Completed '{}'", instance.title())
        };
        let event = AuditEvent::new(
            ctx.tenant.clone(),
            AuditKind::InstanceCompleted,
            instance.id().to_string(),
            Some(ctx.actor.clone()),
            message,
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::RingBufferAuditLog;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::document::{DocumentRepositories, InMemoryDocumentStore};
    use crate::domain::foundation::{DueDate, Role, TenantSettings};
    use crate::domain::instance::InstanceStatus;
    use crate::domain::member::Member;
    use crate::ports::{MemberRepository, TransactionLog};
    use chrono::NaiveDate;

    struct Fixture {
        handler: CompleteInstanceHandler,
        repos: DocumentRepositories,
    }

    async fn fixture(auto_approve: bool) -> Fixture {
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

        if auto_approve {
            let settings = TenantSettings::new(true, 1.0).unwrap();
            SettingsRepository::save(&repos, &ctx.tenant, &settings)
                .await
                .unwrap();
        }

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
        let handler = CompleteInstanceHandler::new(
            Arc::new(repos.clone()),
            Arc::new(repos.clone()),
            awards,
            Arc::new(TenantLockManager::new()),
            audit,
            clock,
        );
        Fixture { handler, repos }
    }

    async fn seed_instance(fixture: &Fixture, assignees: Vec<&str>) -> Instance {
        let ctx = ActorContext::test_parent();
        let instance = Instance::one_off(
            InstanceId::new(),
            "Wash car".to_string(),
            None,
            vec![],
            assignees
                .into_iter()
                .map(|id| MemberId::new(id).unwrap())
                .collect(),
            DueDate::from_ymd(2024, 3, 5).unwrap(),
            10,
        )
        .unwrap();
        InstanceRepository::insert(&fixture.repos, &ctx.tenant, &instance)
            .await
            .unwrap();
        instance
    }

    #[tokio::test]
    async fn assignee_completes_without_award_when_manual() {
        let fixture = fixture(false).await;
        let instance = seed_instance(&fixture, vec!["kid-1"]).await;
        let ctx = ActorContext::test_child("kid-1");

        let result = fixture
            .handler
            .handle(
                CompleteInstanceCommand {
                    instance_id: *instance.id(),
                    photo_proof: Some("photo-1".to_string()),
                },
                ctx.clone(),
            )
            .await
            .unwrap();

        assert_eq!(result.instance.status(), InstanceStatus::Completed);
        assert!(result.transaction.is_none());
        assert_eq!(result.instance.photo_proof(), Some("photo-1"));

        assert!(TransactionLog::list(&fixture.repos, &ctx.tenant)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn auto_approve_verifies_and_awards_in_one_step() {
        let fixture = fixture(true).await;
        let instance = seed_instance(&fixture, vec!["kid-1"]).await;
        let ctx = ActorContext::test_child("kid-1");

        let result = fixture
            .handler
            .handle(
                CompleteInstanceCommand {
                    instance_id: *instance.id(),
                    photo_proof: None,
                },
                ctx.clone(),
            )
            .await
            .unwrap();

        assert_eq!(result.instance.status(), InstanceStatus::Verified);
        assert_eq!(
            result.instance.verified_by(),
            Some(&MemberId::system())
        );
        let tx = result.transaction.unwrap();
        assert_eq!(tx.amount(), 10);

        let member =
            MemberRepository::find_by_id(&fixture.repos, &ctx.tenant, &MemberId::new("kid-1").unwrap())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(member.balance(), 10);
        assert_eq!(
            TransactionLog::list(&fixture.repos, &ctx.tenant)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn claiming_persists_the_new_assignee() {
        let fixture = fixture(false).await;
        let instance = seed_instance(&fixture, vec![]).await;
        let ctx = ActorContext::test_child("kid-1");

        fixture
            .handler
            .handle(
                CompleteInstanceCommand {
                    instance_id: *instance.id(),
                    photo_proof: None,
                },
                ctx.clone(),
            )
            .await
            .unwrap();

        let stored = InstanceRepository::find_by_id(&fixture.repos, &ctx.tenant, instance.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.assignees(), &[MemberId::new("kid-1").unwrap()]);
    }

    #[tokio::test]
    async fn non_assignee_is_unauthorized() {
        let fixture = fixture(false).await;
        let instance = seed_instance(&fixture, vec!["kid-1"]).await;

        let err = fixture
            .handler
            .handle(
                CompleteInstanceCommand {
                    instance_id: *instance.id(),
                    photo_proof: None,
                },
                ActorContext::test_child("kid-2"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn completing_twice_conflicts() {
        let fixture = fixture(false).await;
        let instance = seed_instance(&fixture, vec!["kid-1"]).await;
        let ctx = ActorContext::test_child("kid-1");
        let cmd = CompleteInstanceCommand {
            instance_id: *instance.id(),
            photo_proof: None,
        };

        fixture.handler.handle(cmd.clone(), ctx.clone()).await.unwrap();
        let err = fixture.handler.handle(cmd, ctx).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn missing_instance_is_not_found() {
        let fixture = fixture(false).await;

        let err = fixture
            .handler
            .handle(
                CompleteInstanceCommand {
                    instance_id: InstanceId::new(),
                    photo_proof: None,
                },
                ActorContext::test_child("kid-1"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InstanceNotFound);
    }
}
