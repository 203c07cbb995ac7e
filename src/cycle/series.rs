//! Recurring series projection
//!
//! Computes the stored end date of a series from its duration policy, and
//! projects occurrence dates from the series anchor. Month and year steps are
//! always measured from the anchor, so a series starting on the 31st keeps
//! returning to the 31st whenever the month allows it.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::calendar::{add_months, YearMonth};

/// Unit of repetition for a recurring series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceInterval {
    Day,
    Week,
    Month,
    Year,
}

impl RecurrenceInterval {
    /// Parse an interval from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" | "daily" => Some(Self::Day),
            "week" | "weeks" | "weekly" => Some(Self::Week),
            "month" | "months" | "monthly" => Some(Self::Month),
            "year" | "years" | "yearly" | "annual" => Some(Self::Year),
            _ => None,
        }
    }

    /// Human-readable cadence, e.g. "Every 2 weeks"
    pub fn describe(&self, count: u32) -> String {
        let unit = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        };
        if count == 1 {
            format!("Every {}", unit)
        } else {
            format!("Every {} {}s", count, unit)
        }
    }
}

impl fmt::Display for RecurrenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "Daily"),
            Self::Week => write!(f, "Weekly"),
            Self::Month => write!(f, "Monthly"),
            Self::Year => write!(f, "Yearly"),
        }
    }
}

/// When a recurring series stops producing occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DurationPolicy {
    /// Runs until paused or deleted
    Infinite,
    /// Runs for a fixed number of calendar months from the start date
    FixedMonths { months: u32 },
    /// Runs until the given date (inclusive)
    UntilDate { date: NaiveDate },
}

impl DurationPolicy {
    pub fn description(&self) -> String {
        match self {
            Self::Infinite => "No end".to_string(),
            Self::FixedMonths { months: 1 } => "For 1 month".to_string(),
            Self::FixedMonths { months } => format!("For {} months", months),
            Self::UntilDate { date } => format!("Until {}", date.format("%Y-%m-%d")),
        }
    }
}

impl fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// End date of a series starting on `start` under `policy`
///
/// `UntilDate` is returned verbatim, even when it precedes `start`.
pub fn compute_series_end_date(start: NaiveDate, policy: &DurationPolicy) -> Option<NaiveDate> {
    match policy {
        DurationPolicy::Infinite => None,
        DurationPolicy::FixedMonths { months } => Some(add_months(start, *months)),
        DurationPolicy::UntilDate { date } => Some(*date),
    }
}

/// The `n`-th occurrence (0-based) of a series anchored on `start`
pub fn nth_occurrence(
    start: NaiveDate,
    interval: RecurrenceInterval,
    interval_count: u32,
    n: u32,
) -> NaiveDate {
    let steps = interval_count.max(1).saturating_mul(n);
    match interval {
        RecurrenceInterval::Day => start
            .checked_add_days(Days::new(steps as u64))
            .unwrap_or(NaiveDate::MAX),
        RecurrenceInterval::Week => start
            .checked_add_days(Days::new(steps as u64 * 7))
            .unwrap_or(NaiveDate::MAX),
        RecurrenceInterval::Month => add_months(start, steps),
        RecurrenceInterval::Year => add_months(start, steps.saturating_mul(12)),
    }
}

/// Occurrence schedule of a recurring series
///
/// An `interval_count` of zero is treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    start: NaiveDate,
    interval: RecurrenceInterval,
    interval_count: u32,
    end: Option<NaiveDate>,
}

impl Schedule {
    pub fn new(
        start: NaiveDate,
        interval: RecurrenceInterval,
        interval_count: u32,
        end: Option<NaiveDate>,
    ) -> Self {
        Self {
            start,
            interval,
            interval_count: interval_count.max(1),
            end,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn interval(&self) -> RecurrenceInterval {
        self.interval
    }

    /// Intervals between occurrences, never zero
    pub fn interval_count(&self) -> u32 {
        self.interval_count
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// The `n`-th occurrence, ignoring the end date
    pub fn nth(&self, n: u32) -> NaiveDate {
        nth_occurrence(self.start, self.interval, self.interval_count, n)
    }

    /// Check whether the series has run past its end date by `reference`
    pub fn is_finished_at(&self, reference: NaiveDate) -> bool {
        self.end.is_some_and(|end| reference > end)
    }

    /// First occurrence on or after `reference` that is not past the end date
    pub fn next_on_or_after(&self, reference: NaiveDate) -> Option<NaiveDate> {
        self.first_index_on_or_after(reference).map(|n| self.nth(n))
    }

    /// All occurrences within `[from, to]`, bounded by the end date
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let Some(mut n) = self.first_index_on_or_after(from) else {
            return dates;
        };

        loop {
            let date = self.nth(n);
            if date > to || self.is_past_end(date) {
                break;
            }
            dates.push(date);
            if date == NaiveDate::MAX || n == u32::MAX {
                break;
            }
            n += 1;
        }

        dates
    }

    fn is_past_end(&self, date: NaiveDate) -> bool {
        self.end.is_some_and(|end| date > end)
    }

    fn first_index_on_or_after(&self, reference: NaiveDate) -> Option<u32> {
        let mut n = self.estimate_index(reference);
        loop {
            let date = self.nth(n);
            if self.is_past_end(date) {
                return None;
            }
            if date >= reference {
                return Some(n);
            }
            if date == NaiveDate::MAX || n == u32::MAX {
                return None;
            }
            n += 1;
        }
    }

    /// An index whose occurrence is at or before `reference`, close enough
    /// that only a few forward steps are needed.
    fn estimate_index(&self, reference: NaiveDate) -> u32 {
        if reference <= self.start {
            return 0;
        }

        let count = i64::from(self.interval_count.max(1));
        let estimate = match self.interval {
            RecurrenceInterval::Day => (reference - self.start).num_days() / count,
            RecurrenceInterval::Week => (reference - self.start).num_days() / (7 * count),
            RecurrenceInterval::Month => {
                let months = YearMonth::of(self.start).months_until(YearMonth::of(reference));
                months / count - 1
            }
            RecurrenceInterval::Year => {
                let months = YearMonth::of(self.start).months_until(YearMonth::of(reference));
                months / (12 * count) - 1
            }
        };

        estimate.clamp(0, u32::MAX as i64) as u32
    }
}
