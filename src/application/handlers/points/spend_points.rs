//! SpendPointsHandler - debits a balance for a redemption.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::domain::foundation::{
    ActorContext, DomainError, ErrorCode, MemberId, TransactionId,
};
use crate::domain::ledger::{Direction, PointsTransaction};
use crate::ports::{AuditEvent, AuditKind, AuditLog, Clock, MemberRepository, TransactionLog};

/// Command to spend points from a member's balance.
#[derive(Debug, Clone)]
pub struct SpendPointsCommand {
    pub member_id: MemberId,
    pub amount: u32,

    /// What the points were redeemed for.
    pub reason: String,

    /// Optional reference to the redeemed reward.
    pub reference: Option<String>,
}

/// Handler for spending points.
pub struct SpendPointsHandler {
    members: Arc<dyn MemberRepository>,
    transactions: Arc<dyn TransactionLog>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl SpendPointsHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        transactions: Arc<dyn TransactionLog>,
        locks: Arc<TenantLockManager>,
        audit: Arc<dyn AuditLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            members,
            transactions,
            locks,
            audit,
            clock,
        }
    }

    /// Members spend their own points; parents spend on anyone's behalf.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a non-parent spends for another member
    /// - `MemberNotFound` if the member doesn't exist
    /// - `InsufficientBalance` with required/current/shortfall details
    /// - `ValidationFailed` for a zero amount or empty reason
    pub async fn handle(
        &self,
        cmd: SpendPointsCommand,
        ctx: ActorContext,
    ) -> Result<PointsTransaction, DomainError> {
        if ctx.actor != cmd.member_id {
            ctx.require_parent()?;
        }

        let _guard = self.locks.acquire(&ctx.tenant).await;

        let mut member = self
            .members
            .find_by_id(&ctx.tenant, &cmd.member_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                    .with_detail("member_id", cmd.member_id.to_string())
            })?;

        let transaction = PointsTransaction::new(
            TransactionId::new(),
            cmd.member_id.clone(),
            Direction::Spend,
            cmd.amount,
            cmd.reason,
            cmd.reference,
            self.clock.now(),
        )?;

        member.debit(cmd.amount)?;
        self.members.update(&ctx.tenant, &member).await?;
        self.transactions.append(&ctx.tenant, &transaction).await?;

        let event = AuditEvent::new(
            ctx.tenant.clone(),
            AuditKind::PointsSpent,
            transaction.id().to_string(),
            Some(ctx.actor),
            format!(
                "Spent {} points from {}: {}",
                cmd.amount,
                cmd.member_id,
                transaction.reason()
            ),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(transaction)
    }
}
