//! Role enum for group members.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a member within the tenant.
///
/// Parents create and verify chores; children (and parents) complete them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Parent,
    Child,
}

impl Role {
    /// Returns true if this role may manage templates and verify instances.
    pub fn is_parent(&self) -> bool {
        matches!(self, Role::Parent)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Parent => "Parent",
            Role::Child => "Child",
        };
        write!(f, "{}", s)
    }
}
