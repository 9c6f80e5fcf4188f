//! Cadence value object describing a template's recurrence.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DueDate, ValidationError};

use super::Frequency;

/// Recurrence rule for a chore template.
///
/// # Invariants
///
/// - `day_of_month` is 1-31 when present and only meaningful for monthly
///   cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    frequency: Frequency,

    /// Preferred day of month for monthly cadences.
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_month: Option<u8>,

    /// Last date the template may produce instances for.
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<DueDate>,
}

impl Cadence {
    /// Creates a validated cadence.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `day_of_month` is outside 1-31
    pub fn new(
        frequency: Frequency,
        day_of_month: Option<u8>,
        end_date: Option<DueDate>,
    ) -> Result<Self, ValidationError> {
        if let Some(day) = day_of_month {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::out_of_range("day_of_month", 1, 31, day as i64));
            }
        }
        Ok(Self {
            frequency,
            day_of_month,
            end_date,
        })
    }

    /// A cadence with no day-of-month preference and no end date.
    pub fn simple(frequency: Frequency) -> Self {
        Self {
            frequency,
            day_of_month: None,
            end_date: None,
        }
    }

    /// Returns the recurrence frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the preferred day of month, if configured.
    pub fn day_of_month(&self) -> Option<u8> {
        self.day_of_month
    }

    /// Returns the end date, if configured.
    pub fn end_date(&self) -> Option<DueDate> {
        self.end_date
    }
}
