//! Reference clock port.
//!
//! The whole system runs against one reference clock; injecting it keeps
//! cycle math and the materializer deterministic under test.

use chrono::NaiveDate;

use crate::domain::foundation::Timestamp;

/// Source of "now" and "today".
pub trait Clock: Send + Sync {
    /// Current calendar date. All due-date comparisons use this.
    fn today(&self) -> NaiveDate;

    /// Current instant, for completion/verification timestamps.
    fn now(&self) -> Timestamp;
}
