//! Member aggregate entity.
//!
//! Members are maintained by an external collaborator; the points ledger
//! only ever mutates the balance, eligibility-gated earnings, and lifetime
//! stats - never identity fields.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, MemberId, Role, Timestamp};

/// Member aggregate - one person in the group.
///
/// # Invariants
///
/// - `balance` never goes below zero (debits are rejected instead)
/// - `lifetime_points` and `completed_count` only increase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    display_name: String,
    role: Role,

    /// Spendable point balance.
    balance: i64,

    /// Eligibility flag; awards are a no-op while false.
    can_earn_points: bool,

    /// Lifetime count of verified completions.
    completed_count: u32,

    /// Lifetime points earned (never reduced by spending).
    lifetime_points: i64,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Member {
    /// Creates a new member with a zero balance.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the display name is empty
    pub fn new(id: MemberId, display_name: String, role: Role) -> Result<Self, DomainError> {
        if display_name.trim().is_empty() {
            return Err(DomainError::validation(
                "display_name",
                "Display name cannot be empty",
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            id,
            display_name,
            role,
            balance: 0,
            can_earn_points: true,
            completed_count: 0,
            lifetime_points: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a member from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: MemberId,
        display_name: String,
        role: Role,
        balance: i64,
        can_earn_points: bool,
        completed_count: u32,
        lifetime_points: i64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            display_name,
            role,
            balance,
            can_earn_points,
            completed_count,
            lifetime_points,
            created_at,
            updated_at,
        }
    }

    // Accessors

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn can_earn_points(&self) -> bool {
        self.can_earn_points
    }

    pub fn completed_count(&self) -> u32 {
        self.completed_count
    }

    pub fn lifetime_points(&self) -> i64 {
        self.lifetime_points
    }

    // Mutations

    /// Credits earned points and bumps the lifetime stats.
    pub fn credit(&mut self, amount: u32) {
        self.balance += i64::from(amount);
        self.lifetime_points += i64::from(amount);
        self.completed_count += 1;
        self.updated_at = Timestamp::now();
    }

    /// Debits spent points.
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance` (with required/current/shortfall details) if
    ///   the balance cannot cover the amount
    pub fn debit(&mut self, amount: u32) -> Result<(), DomainError> {
        let required = i64::from(amount);
        if self.balance < required {
            return Err(DomainError::insufficient_balance(required, self.balance));
        }
        self.balance -= required;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Toggles earning eligibility.
    pub fn set_can_earn_points(&mut self, eligible: bool) {
        self.can_earn_points = eligible;
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn test_member() -> Member {
        Member::new(MemberId::new("kid-1").unwrap(), "Sam".to_string(), Role::Child).unwrap()
    }

    #[test]
    fn new_member_starts_at_zero() {
        let member = test_member();
        assert_eq!(member.balance(), 0);
        assert_eq!(member.completed_count(), 0);
        assert_eq!(member.lifetime_points(), 0);
        assert!(member.can_earn_points());
    }

    #[test]
    fn new_member_rejects_empty_name() {
        let result = Member::new(MemberId::new("kid-1").unwrap(), "  ".to_string(), Role::Child);
        assert!(result.is_err());
    }

    #[test]
    fn credit_increases_balance_and_stats() {
        let mut member = test_member();
        member.credit(10);
        member.credit(5);

        assert_eq!(member.balance(), 15);
        assert_eq!(member.lifetime_points(), 15);
        assert_eq!(member.completed_count(), 2);
    }

    #[test]
    fn debit_reduces_balance_only() {
        let mut member = test_member();
        member.credit(20);
        member.debit(15).unwrap();

        assert_eq!(member.balance(), 5);
        assert_eq!(member.lifetime_points(), 20);
    }

    #[test]
    fn debit_beyond_balance_reports_shortfall() {
        let mut member = test_member();
        member.credit(10);

        let err = member.debit(25).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
        assert_eq!(err.details.get("required"), Some(&"25".to_string()));
        assert_eq!(err.details.get("current"), Some(&"10".to_string()));
        assert_eq!(err.details.get("shortfall"), Some(&"15".to_string()));
        assert_eq!(member.balance(), 10);
    }

    #[test]
    fn eligibility_can_be_toggled() {
        let mut member = test_member();
        member.set_can_earn_points(false);
        assert!(!member.can_earn_points());
    }

    #[test]
    fn serialization_round_trip() {
        let mut member = test_member();
        member.credit(12);

        let json = serde_json::to_string(&member).unwrap();
        let restored: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(member, restored);
    }
}
