//! Date-only due date value object.
//!
//! Due dates carry no time component; all comparisons are date equality
//! and date ordering, never timestamp comparison.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date a task instance is due, always date-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    /// Creates a due date from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a due date from year/month/day, if valid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the inner date.
    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    /// Strictly earlier than the given day.
    pub fn is_before(&self, day: NaiveDate) -> bool {
        self.0 < day
    }

    /// The given day or later.
    pub fn is_on_or_after(&self, day: NaiveDate) -> bool {
        self.0 >= day
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_ymd_rejects_invalid_dates() {
        assert!(DueDate::from_ymd(2024, 2, 30).is_none());
        assert!(DueDate::from_ymd(2024, 2, 29).is_some());
    }

    #[test]
    fn is_before_is_strict() {
        let due = DueDate::from_ymd(2024, 3, 10).unwrap();
        assert!(due.is_before(date(2024, 3, 11)));
        assert!(!due.is_before(date(2024, 3, 10)));
        assert!(!due.is_before(date(2024, 3, 9)));
    }

    #[test]
    fn is_on_or_after_includes_same_day() {
        let due = DueDate::from_ymd(2024, 3, 10).unwrap();
        assert!(due.is_on_or_after(date(2024, 3, 10)));
        assert!(due.is_on_or_after(date(2024, 3, 9)));
        assert!(!due.is_on_or_after(date(2024, 3, 11)));
    }

    #[test]
    fn serializes_as_plain_date_string() {
        let due = DueDate::from_ymd(2024, 3, 5).unwrap();
        let json = serde_json::to_string(&due).unwrap();
        assert_eq!(json, "\"2024-03-05\"");
    }

    #[test]
    fn display_is_zero_padded() {
        let due = DueDate::from_ymd(2024, 1, 2).unwrap();
        assert_eq!(due.to_string(), "2024-01-02");
    }
}
