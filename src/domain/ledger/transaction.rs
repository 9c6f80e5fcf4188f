//! Immutable points ledger entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, MemberId, Timestamp, TransactionId};

/// Whether points flowed into or out of a member's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Earn,
    Spend,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Earn => "earn",
            Direction::Spend => "spend",
        };
        write!(f, "{}", s)
    }
}

/// One append-only ledger entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTransaction {
    id: TransactionId,
    member_id: MemberId,
    direction: Direction,
    amount: u32,

    /// Human-readable reason shown in history views.
    reason: String,

    /// The instance or reward this entry refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,

    created_at: Timestamp,
}

impl PointsTransaction {
    /// Creates a ledger entry.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the amount is zero or the reason is empty
    pub fn new(
        id: TransactionId,
        member_id: MemberId,
        direction: Direction,
        amount: u32,
        reason: String,
        reference: Option<String>,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if amount == 0 {
            return Err(DomainError::validation("amount", "Amount must be positive"));
        }
        if reason.trim().is_empty() {
            return Err(DomainError::validation("reason", "Reason cannot be empty"));
        }
        Ok(Self {
            id,
            member_id,
            direction,
            amount,
            reason,
            reference,
            created_at,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(direction: Direction, amount: u32) -> Result<PointsTransaction, DomainError> {
        PointsTransaction::new(
            TransactionId::new(),
            MemberId::new("kid-1").unwrap(),
            direction,
            amount,
            "Completed: Take out trash".to_string(),
            Some("instance-abc".to_string()),
            Timestamp::now(),
        )
    }

    #[test]
    fn creates_valid_earn_entry() {
        let tx = entry(Direction::Earn, 10).unwrap();
        assert_eq!(tx.direction(), Direction::Earn);
        assert_eq!(tx.amount(), 10);
        assert_eq!(tx.reference(), Some("instance-abc"));
    }

    #[test]
    fn rejects_zero_amount() {
        assert!(entry(Direction::Earn, 0).is_err());
    }

    #[test]
    fn rejects_empty_reason() {
        let result = PointsTransaction::new(
            TransactionId::new(),
            MemberId::new("kid-1").unwrap(),
            Direction::Spend,
            5,
            "  ".to_string(),
            None,
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn direction_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&Direction::Earn).unwrap(), "\"earn\"");
        assert_eq!(serde_json::to_string(&Direction::Spend).unwrap(), "\"spend\"");
    }

    #[test]
    fn serialization_round_trip() {
        let tx = entry(Direction::Spend, 7).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        let restored: PointsTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, restored);
    }
}
