//! Member module - group members and their point balances.

mod aggregate;

pub use aggregate::Member;
