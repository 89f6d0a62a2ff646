//! # Date utilities
//!
//! This module yields utilities for enumerating the calendar days covered by a traffic table
//! and for locating those days relative to the awards event.
//!

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Produces every calendar day from `start` to `end`, both included, in ascending order.
///
/// An empty vector is returned when `end` precedes `start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// The calendar window used to simulate the awards traffic spike.
///
/// The week covers `reference_date` plus/minus `half_width_days` (inclusive on both sides),
/// the night is `reference_date` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardsWindow {
    pub reference_date: NaiveDate,
    pub half_width_days: i64,
}

impl AwardsWindow {
    pub fn new(reference_date: NaiveDate, half_width_days: i64) -> Self {
        Self {
            reference_date,
            half_width_days,
        }
    }

    /// The first day of the awards week.
    pub fn first_day(&self) -> NaiveDate {
        self.reference_date - Duration::days(self.half_width_days)
    }

    /// The last day of the awards week.
    pub fn last_day(&self) -> NaiveDate {
        self.reference_date + Duration::days(self.half_width_days)
    }

    pub fn is_awards_week(&self, day: NaiveDate) -> bool {
        day >= self.first_day() && day <= self.last_day()
    }

    pub fn is_awards_night(&self, day: NaiveDate) -> bool {
        day == self.reference_date
    }

    /// Boolean masks (week, night) aligned with the given days.
    pub fn masks(&self, days: &[NaiveDate]) -> (Vec<bool>, Vec<bool>) {
        days.iter()
            .map(|day| (self.is_awards_week(*day), self.is_awards_night(*day)))
            .unzip()
    }
}
