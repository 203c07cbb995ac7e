//! Recurring series model
//!
//! A recurring series is a template for repeating transactions. Its
//! configuration is replaced as a whole on edit, and the end date is
//! recomputed from the duration policy each time that happens. Readers never
//! re-derive it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SeriesId;
use super::money::Money;
use super::transaction::PaymentSource;
use crate::cycle::{compute_series_end_date, DurationPolicy, RecurrenceInterval, Schedule};

pub const MAX_INTERVAL_COUNT: u32 = 30;
pub const MAX_DURATION_MONTHS: u32 = 120;

/// User-editable configuration of a recurring series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub description: String,

    /// Amount of each occurrence (negative for charges)
    pub amount: Money,

    pub source: PaymentSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub interval: RecurrenceInterval,

    /// Number of intervals between occurrences (1-30)
    pub interval_count: u32,

    pub start_date: NaiveDate,

    pub duration: DurationPolicy,
}

impl SeriesConfig {
    pub fn validate(&self) -> Result<(), SeriesValidationError> {
        if self.description.trim().is_empty() {
            return Err(SeriesValidationError::EmptyDescription);
        }

        if self.amount.is_zero() {
            return Err(SeriesValidationError::ZeroAmount);
        }

        if !(1..=MAX_INTERVAL_COUNT).contains(&self.interval_count) {
            return Err(SeriesValidationError::IntervalCountOutOfRange(
                self.interval_count,
            ));
        }

        match self.duration {
            DurationPolicy::FixedMonths { months } if !(1..=MAX_DURATION_MONTHS).contains(&months) => {
                Err(SeriesValidationError::DurationMonthsOutOfRange(months))
            }
            DurationPolicy::UntilDate { date } if date < self.start_date => {
                Err(SeriesValidationError::EndBeforeStart {
                    start: self.start_date,
                    end: date,
                })
            }
            _ => Ok(()),
        }
    }
}

/// A stored recurring series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringSeries {
    pub id: SeriesId,

    #[serde(flatten)]
    pub config: SeriesConfig,

    /// Derived from `config.duration` when the config was last set
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub paused: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringSeries {
    pub fn new(config: SeriesConfig) -> Self {
        let now = Utc::now();
        let end_date = compute_series_end_date(config.start_date, &config.duration);
        Self {
            id: SeriesId::new(),
            config,
            end_date,
            paused: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the whole configuration and recompute the end date
    pub fn replace_config(&mut self, config: SeriesConfig) {
        self.end_date = compute_series_end_date(config.start_date, &config.duration);
        self.config = config;
        self.updated_at = Utc::now();
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.updated_at = Utc::now();
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.updated_at = Utc::now();
    }

    /// Occurrence schedule using the stored end date
    pub fn schedule(&self) -> Schedule {
        Schedule::new(
            self.config.start_date,
            self.config.interval,
            self.config.interval_count,
            self.end_date,
        )
    }

    /// Next occurrence on or after `reference`, or None when paused or ended
    pub fn next_due(&self, reference: NaiveDate) -> Option<NaiveDate> {
        if self.paused {
            return None;
        }
        self.schedule().next_on_or_after(reference)
    }

    /// Occurrences within `[from, to]`, empty when paused
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        if self.paused {
            return Vec::new();
        }
        self.schedule().between(from, to)
    }

    pub fn is_finished_at(&self, reference: NaiveDate) -> bool {
        self.schedule().is_finished_at(reference)
    }

    pub fn cadence(&self) -> String {
        self.config
            .interval
            .describe(self.config.interval_count)
    }
}

impl fmt::Display for RecurringSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.config.description,
            self.config.amount,
            self.cadence().to_lowercase()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesValidationError {
    EmptyDescription,
    ZeroAmount,
    IntervalCountOutOfRange(u32),
    DurationMonthsOutOfRange(u32),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for SeriesValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Series description cannot be empty"),
            Self::ZeroAmount => write!(f, "Series amount cannot be zero"),
            Self::IntervalCountOutOfRange(n) => write!(
                f,
                "Interval count must be between 1 and {} (got {})",
                MAX_INTERVAL_COUNT, n
            ),
            Self::DurationMonthsOutOfRange(n) => write!(
                f,
                "Duration must be between 1 and {} months (got {})",
                MAX_DURATION_MONTHS, n
            ),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for SeriesValidationError {}
