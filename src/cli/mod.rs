//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Argument values
//! arrive as strings and are parsed here so error messages can name the
//! offending flag.

pub mod account;
pub mod card;
pub mod export;
pub mod report;
pub mod series;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use card::{handle_card_command, CardCommands};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportCommands};
pub use series::{handle_series_command, SeriesCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};

use crate::cycle::YearMonth;
use crate::error::{CycleError, CycleResult};
use crate::models::{Money, PaymentSource};
use crate::services::{AccountService, CardService};
use crate::storage::Storage;

/// Parse a `YYYY-MM-DD` date, defaulting to today's local date
pub fn parse_date_or_today(value: Option<&str>) -> CycleResult<NaiveDate> {
    match value {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn parse_date(value: &str) -> CycleResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CycleError::Validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD format.",
            value
        ))
    })
}

/// Parse a `YYYY-MM` month, defaulting to the month of `fallback`
pub fn parse_month_or(value: Option<&str>, fallback: NaiveDate) -> CycleResult<YearMonth> {
    match value {
        Some(s) => YearMonth::parse(s.trim()).ok_or_else(|| {
            CycleError::Validation(format!("Invalid month: '{}'. Use YYYY-MM format.", s))
        }),
        None => Ok(YearMonth::of(fallback)),
    }
}

pub fn parse_amount(value: &str) -> CycleResult<Money> {
    Money::parse(value).map_err(|e| {
        CycleError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '12.50' or '-12.50'. Error: {}",
            value, e
        ))
    })
}

/// Resolve `--card` / `--account` flags to a payment source
///
/// Exactly one of the two must be given.
pub fn resolve_source(
    storage: &Storage,
    card: Option<&str>,
    account: Option<&str>,
) -> CycleResult<PaymentSource> {
    match (card, account) {
        (Some(card), None) => Ok(PaymentSource::Card(CardService::new(storage).require(card)?.id)),
        (None, Some(account)) => Ok(PaymentSource::Account(
            AccountService::new(storage).require(account)?.id,
        )),
        _ => Err(CycleError::Validation(
            "Specify exactly one of --card or --account".into(),
        )),
    }
}
