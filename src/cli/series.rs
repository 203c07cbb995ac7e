//! Recurring series CLI commands

use chrono::{Days, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::cycle::{DurationPolicy, RecurrenceInterval};
use crate::display::{format_series_details, format_series_list, format_upcoming};
use crate::error::{CycleError, CycleResult};
use crate::models::SeriesConfig;
use crate::services::{source_name, SeriesService};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_date_or_today, resolve_source};

/// Number of upcoming dates shown by `series show`
const PREVIEW_OCCURRENCES: usize = 5;

/// Recurring series subcommands
#[derive(Subcommand)]
pub enum SeriesCommands {
    /// Create a recurring series
    Add {
        /// Description (e.g., "Streaming subscription")
        description: String,
        /// Amount per occurrence; negative for charges
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Credit card charged
        #[arg(long, conflicts_with = "account")]
        card: Option<String>,
        /// Account charged
        #[arg(long)]
        account: Option<String>,
        /// Interval unit (day, week, month, year)
        #[arg(short, long, default_value = "month")]
        every: String,
        /// Number of interval units between occurrences
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
        /// First occurrence (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<String>,
        /// Stop after this many months
        #[arg(long, conflicts_with = "until")]
        months: Option<u32>,
        /// Stop after this date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        until: Option<String>,
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// List recurring series
    List {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show a series and its next occurrences
    Show {
        /// Series ID or description
        series: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Replace the configuration of a series
    ///
    /// Flags that are not given keep their current value.
    Edit {
        /// Series ID or description
        series: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long, conflicts_with = "account")]
        card: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(short, long)]
        every: Option<String>,
        #[arg(short = 'n', long)]
        count: Option<u32>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(long, conflicts_with_all = ["until", "no_end"])]
        months: Option<u32>,
        #[arg(long, conflicts_with = "no_end")]
        until: Option<String>,
        /// Remove the end of the series
        #[arg(long)]
        no_end: bool,
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// Stop a series from producing occurrences
    Pause {
        series: String,
    },
    /// Resume a paused series
    Resume {
        series: String,
    },
    /// Delete a series (posted transactions are kept)
    Delete {
        series: String,
    },
    /// Show charges due in the next days
    Upcoming {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Window length in days (default from settings)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Record transactions for every occurrence due up to a date
    Post {
        /// Post through this date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn handle_series_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SeriesCommands,
) -> CycleResult<()> {
    let service = SeriesService::new(storage);

    match cmd {
        SeriesCommands::Add {
            description,
            amount,
            card,
            account,
            every,
            count,
            start,
            months,
            until,
            category,
        } => {
            let config = SeriesConfig {
                description,
                amount: parse_amount(&amount)?,
                source: resolve_source(storage, card.as_deref(), account.as_deref())?,
                category,
                interval: parse_interval(&every)?,
                interval_count: count,
                start_date: parse_date_or_today(start.as_deref())?,
                duration: parse_duration(months, until.as_deref())?.unwrap_or(DurationPolicy::Infinite),
            };

            let series = service.create(config)?;
            println!("Created series: {}", series.config.description);
            println!("  ID:       {}", series.id);
            println!("  Schedule: {}", series.cadence());
            println!("  Duration: {}", series.config.duration);
        }

        SeriesCommands::List { date } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let rows = service
                .list()?
                .into_iter()
                .map(|s| {
                    let source = source_name(storage, s.config.source)?;
                    Ok((s, source))
                })
                .collect::<CycleResult<Vec<_>>>()?;
            println!("{}", format_series_list(&rows, reference));
        }

        SeriesCommands::Show { series, date } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let series = service.require(&series)?;
            let source = source_name(storage, series.config.source)?;

            let mut upcoming = Vec::new();
            let mut cursor = Some(reference);
            while let Some(from) = cursor {
                if upcoming.len() == PREVIEW_OCCURRENCES {
                    break;
                }
                match series.next_due(from) {
                    Some(due) => {
                        upcoming.push(due);
                        cursor = due.succ_opt();
                    }
                    None => cursor = None,
                }
            }

            print!(
                "{}",
                format_series_details(&series, &source, reference, &upcoming)
            );
        }

        SeriesCommands::Edit {
            series,
            description,
            amount,
            card,
            account,
            every,
            count,
            start,
            months,
            until,
            no_end,
            category,
        } => {
            let existing = service.require(&series)?;
            let mut config = existing.config.clone();

            if let Some(description) = description {
                config.description = description;
            }
            if let Some(amount) = amount {
                config.amount = parse_amount(&amount)?;
            }
            if card.is_some() || account.is_some() {
                config.source = resolve_source(storage, card.as_deref(), account.as_deref())?;
            }
            if let Some(every) = every {
                config.interval = parse_interval(&every)?;
            }
            if let Some(count) = count {
                config.interval_count = count;
            }
            if let Some(start) = start {
                config.start_date = parse_date(&start)?;
            }
            if no_end {
                config.duration = DurationPolicy::Infinite;
            } else if let Some(duration) = parse_duration(months, until.as_deref())? {
                config.duration = duration;
            }
            if let Some(category) = category {
                config.category = Some(category);
            }

            if config == existing.config {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(existing.id, config)?;
            println!("Updated series: {}", updated.config.description);
            match updated.end_date {
                Some(end) => println!("  Ends: {}", end),
                None => println!("  Ends: never"),
            }
        }

        SeriesCommands::Pause { series } => {
            let found = service.require(&series)?;
            let paused = service.pause(found.id)?;
            println!("Paused series: {}", paused.config.description);
        }

        SeriesCommands::Resume { series } => {
            let found = service.require(&series)?;
            let resumed = service.resume(found.id)?;
            println!("Resumed series: {}", resumed.config.description);
        }

        SeriesCommands::Delete { series } => {
            let found = service.require(&series)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted series: {}", deleted.config.description);
        }

        SeriesCommands::Upcoming { date, days } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let days = days.unwrap_or(settings.upcoming_days);
            let charges = service.upcoming(reference, days)?;

            println!("Upcoming charges {} to {}", reference, window_end(reference, days));
            println!("{}", format_upcoming(&charges));
        }

        SeriesCommands::Post { date } => {
            let through = parse_date_or_today(date.as_deref())?;
            let posted = service.post_due(through)?;

            if posted.is_empty() {
                println!("Nothing to post through {}.", through);
            } else {
                for txn in &posted {
                    println!(
                        "  {}  {:<30} {:>12}",
                        txn.date,
                        txn.display_description(),
                        txn.amount
                    );
                }
                println!("Posted {} transaction(s).", posted.len());
            }
        }
    }

    Ok(())
}

fn parse_interval(value: &str) -> CycleResult<RecurrenceInterval> {
    RecurrenceInterval::parse(value).ok_or_else(|| {
        CycleError::Validation(format!(
            "Invalid interval: '{}'. Valid intervals: day, week, month, year",
            value
        ))
    })
}

/// Build a duration policy from `--months` / `--until`, if either was given
fn parse_duration(months: Option<u32>, until: Option<&str>) -> CycleResult<Option<DurationPolicy>> {
    match (months, until) {
        (Some(months), None) => Ok(Some(DurationPolicy::FixedMonths { months })),
        (None, Some(until)) => Ok(Some(DurationPolicy::UntilDate {
            date: parse_date(until)?,
        })),
        (None, None) => Ok(None),
        (Some(_), Some(_)) => Err(CycleError::Validation(
            "Specify only one of --months or --until".into(),
        )),
    }
}

fn window_end(reference: NaiveDate, days: u32) -> NaiveDate {
    reference
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(None, None).unwrap(), None);
        assert_eq!(
            parse_duration(Some(12), None).unwrap(),
            Some(DurationPolicy::FixedMonths { months: 12 })
        );
        assert_eq!(
            parse_duration(None, Some("2025-06-30")).unwrap(),
            Some(DurationPolicy::UntilDate {
                date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
            })
        );
        assert!(parse_duration(Some(3), Some("2025-06-30")).is_err());
        assert!(parse_duration(None, Some("June")).is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("weekly").unwrap(), RecurrenceInterval::Week);
        assert!(parse_interval("fortnight").unwrap_err().is_validation());
    }

    #[test]
    fn test_window_end() {
        let reference = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
        assert_eq!(
            window_end(reference, 30),
            NaiveDate::from_ymd_opt(2025, 1, 19).unwrap()
        );
    }
}
