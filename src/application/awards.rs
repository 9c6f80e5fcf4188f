//! Award service - the single gateway from a verified instance to the
//! points ledger.
//!
//! Runs exactly once per transition into `Verified`. The instance carrying
//! the `points_awarded` flag is the first durable write: a storage failure
//! while crediting the member or appending the ledger entry leaves the
//! flag persisted, so a retried verification can never credit twice.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{
    DomainError, ErrorCode, TenantId, TenantSettings, TransactionId,
};
use crate::domain::instance::Instance;
use crate::domain::ledger::{Direction, PointsTransaction};
use crate::ports::{
    AuditEvent, AuditKind, AuditLog, Clock, InstanceRepository, MemberRepository, TransactionLog,
};

/// Credits a member for a verified instance and records the ledger entry.
pub struct AwardService {
    instances: Arc<dyn InstanceRepository>,
    members: Arc<dyn MemberRepository>,
    transactions: Arc<dyn TransactionLog>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl AwardService {
    pub fn new(
        instances: Arc<dyn InstanceRepository>,
        members: Arc<dyn MemberRepository>,
        transactions: Arc<dyn TransactionLog>,
        audit: Arc<dyn AuditLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            instances,
            members,
            transactions,
            audit,
            clock,
        }
    }

    /// Awards points for the instance to the member recorded in
    /// `completed_by`.
    ///
    /// Returns `None` without touching the ledger when points were already
    /// awarded, the member cannot earn points, or the multiplied amount
    /// rounds to zero; the caller then persists the instance itself. When
    /// an award is due, the flagged instance is persisted here, before the
    /// member balance and the ledger entry.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the instance has no recorded completer
    /// - `MemberNotFound` if the completer is not a known member
    pub async fn award(
        &self,
        tenant: &TenantId,
        instance: &mut Instance,
        settings: &TenantSettings,
    ) -> Result<Option<PointsTransaction>, DomainError> {
        if instance.points_awarded() {
            return Ok(None);
        }

        let earner = instance
            .completed_by()
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::InternalError,
                    "Cannot award an instance with no recorded completer",
                )
                .with_detail("instance_id", instance.id().to_string())
            })?;

        let mut member = self
            .members
            .find_by_id(tenant, &earner)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, "Completer is not a known member")
                    .with_detail("member_id", earner.to_string())
            })?;

        if !member.can_earn_points() {
            return Ok(None);
        }

        let amount = (f64::from(instance.points()) * settings.point_multiplier).round() as u32;
        if amount == 0 {
            return Ok(None);
        }

        // The flag must hit storage before the balance or the ledger do;
        // otherwise a failure between those writes re-arms the award on
        // retry and credits the member twice.
        instance.mark_awarded()?;
        self.instances.update(tenant, instance).await?;

        member.credit(amount);
        self.members.update(tenant, &member).await?;

        let transaction = PointsTransaction::new(
            TransactionId::new(),
            earner.clone(),
            Direction::Earn,
            amount,
            format!("Completed: {}", instance.title()),
            Some(instance.id().to_string()),
            self.clock.now(),
        )?;
        self.transactions.append(tenant, &transaction).await?;

        let event = AuditEvent::new(
            tenant.clone(),
            AuditKind::PointsAwarded,
            transaction.id().to_string(),
            Some(earner),
            format!("Awarded {} points for '{}'", amount, instance.title()),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(Some(transaction))
    }
}
