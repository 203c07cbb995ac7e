//! Calendar helpers shared by the invoice and series calculators
//!
//! Every construction of a (year, month, day) triple goes through
//! [`YearMonth::day`], which clamps the day to the month's length. Day 31
//! in April is April 30, day 30 in February is the 28th or 29th.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month in a specific year (month is 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a year/month pair
    ///
    /// Returns None for months outside 1-12, and for months whose first day
    /// or whose following month's first day chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        let ym = Self { year, month };
        let next = ym.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)?;
        Some(ym)
    }

    /// The month containing the given date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month, rolling December into January of the next year
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month, rolling January back into December
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Number of days in this month
    pub fn days_in_month(self) -> u32 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// Build a date in this month, clamping `day` into `1..=days_in_month`
    pub fn day(self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or(if self.year > 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        })
    }

    /// First day of this month
    pub fn first_day(self) -> NaiveDate {
        self.day(1)
    }

    /// Last day of this month
    pub fn last_day(self) -> NaiveDate {
        self.day(self.days_in_month())
    }

    /// Check if a date falls within this month
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(self, other: YearMonth) -> i64 {
        (other.year as i64 - self.year as i64) * 12 + (other.month as i64 - self.month as i64)
    }

    /// Iterate over every month from `self` through `end` inclusive
    pub fn through(self, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        let count = self.months_until(end).max(-1) + 1;
        std::iter::successors(Some(self), |m| Some(m.next())).take(count as usize)
    }

    /// Parse a "YYYY-MM" string
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:04}-{:02}", self.year, self.month))
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", s))
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Add calendar months to a date, clamping the day to the target month's length
///
/// Saturates at `NaiveDate::MAX` instead of failing.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
