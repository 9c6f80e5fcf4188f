//! InstanceStatus enum for the task lifecycle state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task instance.
///
/// Transitions are monotonic (`Pending -> Completed -> Verified`) except
/// the explicit reject transition (`Completed -> Pending`). `Verified` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    #[default]
    Pending,
    Completed,
    Verified,
}

impl InstanceStatus {
    /// Returns true once the instance has been finished for its cycle
    /// (completed or verified). Settled instances are never expired by the
    /// materializer and block re-materialization of their cycle.
    pub fn is_settled(&self) -> bool {
        matches!(self, InstanceStatus::Completed | InstanceStatus::Verified)
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstanceStatus::Verified)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Pending -> Completed
    /// - Completed -> Verified
    /// - Completed -> Pending (explicit reject)
    pub fn can_transition_to(&self, target: &InstanceStatus) -> bool {
        use InstanceStatus::*;
        matches!(
            (self, target),
            (Pending, Completed) | (Completed, Verified) | (Completed, Pending)
        )
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceStatus::Pending => "Pending",
            InstanceStatus::Completed => "Completed",
            InstanceStatus::Verified => "Verified",
        };
        write!(f, "{}", s)
    }
}
