//! Clock adapters.

use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Settable clock for tests; advancing it simulates the passage of days.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock pinned to midnight UTC on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        Self {
            now: RwLock::new(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()),
        }
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(instant),
        }
    }

    /// Moves the clock forward by whole days.
    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = *now + chrono::Days::new(days);
    }

    pub fn set_date(&self, date: NaiveDate) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .date_naive()
    }

    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(*self.now.read().unwrap_or_else(|e| e.into_inner()))
    }
}
