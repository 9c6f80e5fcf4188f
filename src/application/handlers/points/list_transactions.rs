//! ListTransactionsHandler - ledger history reads.

use std::sync::Arc;

use crate::domain::foundation::{ActorContext, DomainError, MemberId};
use crate::domain::ledger::PointsTransaction;
use crate::ports::TransactionLog;

/// Query for ledger entries. `member_id = None` lists the whole tenant.
#[derive(Debug, Clone, Default)]
pub struct ListTransactionsQuery {
    pub member_id: Option<MemberId>,
}

/// Handler for transaction history reads.
pub struct ListTransactionsHandler {
    transactions: Arc<dyn TransactionLog>,
}

impl ListTransactionsHandler {
    pub fn new(transactions: Arc<dyn TransactionLog>) -> Self {
        Self { transactions }
    }

    /// Members read their own history; parents read anyone's or the whole
    /// tenant ledger. Entries come back oldest first.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a non-parent asks beyond their own history
    pub async fn handle(
        &self,
        query: ListTransactionsQuery,
        ctx: ActorContext,
    ) -> Result<Vec<PointsTransaction>, DomainError> {
        match query.member_id {
            Some(member_id) => {
                if ctx.actor != member_id {
                    ctx.require_parent()?;
                }
                self.transactions.list_by_member(&ctx.tenant, &member_id).await
            }
            None => {
                ctx.require_parent()?;
                self.transactions.list(&ctx.tenant).await
            }
        }
    }
}
