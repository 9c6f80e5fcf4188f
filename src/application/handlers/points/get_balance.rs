//! GetBalanceHandler - a member's balance and lifetime stats.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActorContext, DomainError, ErrorCode, MemberId};
use crate::ports::MemberRepository;

/// Query for a member's balance.
#[derive(Debug, Clone)]
pub struct GetBalanceQuery {
    pub member_id: MemberId,
}

/// Balance snapshot returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub member_id: MemberId,
    pub balance: i64,
    pub lifetime_points: i64,
    pub completed_count: u32,
    pub can_earn_points: bool,
}

/// Handler for balance reads.
pub struct GetBalanceHandler {
    members: Arc<dyn MemberRepository>,
}

impl GetBalanceHandler {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    /// Members read their own balance; parents read anyone's.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a non-parent asks about another member
    /// - `MemberNotFound` if the member doesn't exist
    pub async fn handle(
        &self,
        query: GetBalanceQuery,
        ctx: ActorContext,
    ) -> Result<BalanceView, DomainError> {
        if ctx.actor != query.member_id {
            ctx.require_parent()?;
        }

        let member = self
            .members
            .find_by_id(&ctx.tenant, &query.member_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                    .with_detail("member_id", query.member_id.to_string())
            })?;

        Ok(BalanceView {
            member_id: member.id().clone(),
            balance: member.balance(),
            lifetime_points: member.lifetime_points(),
            completed_count: member.completed_count(),
            can_earn_points: member.can_earn_points(),
        })
    }
}
