//! Cycle identifiers and due-date computation.
//!
//! A cycle identifier canonically tags the period (day, ISO week, month)
//! an instance belongs to. Same date and frequency always produce the same
//! identifier, and identifiers for different frequencies never collide.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::DueDate;

use super::{Cadence, Frequency};

/// Canonical period tag: `YYYY-MM-DD` (daily), `YYYY-Www` (weekly,
/// ISO-8601 week of the ISO week-year), `YYYY-MM` (monthly).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(String);

impl CycleId {
    /// Derives the cycle identifier for a date under the given frequency.
    pub fn for_date(date: NaiveDate, frequency: Frequency) -> Self {
        let tag = match frequency {
            Frequency::Daily => date.format("%Y-%m-%d").to_string(),
            Frequency::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Frequency::Monthly => date.format("%Y-%m").to_string(),
        };
        Self(tag)
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the due date for a new instance of the cadence, relative to
/// `today`.
///
/// Rules:
/// - daily: due today
/// - weekly: due the upcoming Sunday (today if today is Sunday)
/// - monthly: due on the configured day-of-month clamped to the month's
///   length, rolled one month forward when that day has already passed;
///   end of the current month when no day is configured
///
/// `explicit_first` is the template's own stored due date; when present
/// (only passed on the very first materialization, before any cursor
/// exists) it is used verbatim instead of recomputation.
///
/// Returns `None` when the cadence's end date is strictly before the
/// resulting due date: the template is exhausted and no instance is
/// produced.
pub fn compute_due_date(
    today: NaiveDate,
    cadence: &Cadence,
    explicit_first: Option<DueDate>,
) -> Option<DueDate> {
    let due = match explicit_first {
        Some(date) => date,
        None => DueDate::from_date(match cadence.frequency() {
            Frequency::Daily => today,
            Frequency::Weekly => upcoming_sunday(today),
            Frequency::Monthly => monthly_due(today, cadence.day_of_month()),
        }),
    };

    match cadence.end_date() {
        Some(end) if end < due => None,
        _ => Some(due),
    }
}

fn upcoming_sunday(today: NaiveDate) -> NaiveDate {
    let offset = match today.weekday() {
        Weekday::Sun => 0,
        day => 7 - day.num_days_from_sunday() as u64,
    };
    today + Days::new(offset)
}

fn monthly_due(today: NaiveDate, day_of_month: Option<u8>) -> NaiveDate {
    match day_of_month {
        None => end_of_month(today),
        Some(day) => {
            let candidate = clamp_to_month(today, day);
            if candidate < today {
                let next_month = first_of_month(today) + Months::new(1);
                clamp_to_month(next_month, day)
            } else {
                candidate
            }
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 is valid in every month")
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date) + Months::new(1) - Days::new(1)
}

fn clamp_to_month(date: NaiveDate, day: u8) -> NaiveDate {
    let last = end_of_month(date).day();
    first_of_month(date) + Days::new(u64::from(day.min(last as u8)) - 1)
}
