//! JSON export
//!
//! Writes every stored entity into one versioned document.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CycleError, CycleResult};
use crate::models::{Account, CreditCard, PaymentSource, RecurringSeries, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Version of cardcycle that wrote the export
    pub app_version: String,

    pub accounts: Vec<Account>,

    pub cards: Vec<CreditCard>,

    pub series: Vec<RecurringSeries>,

    pub transactions: Vec<Transaction>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub account_count: usize,
    pub card_count: usize,
    pub series_count: usize,
    pub transaction_count: usize,
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> CycleResult<Self> {
        let accounts = storage.accounts.get_all()?;
        let cards = storage.cards.get_all()?;
        let series = storage.series.get_all()?;
        let transactions = storage.transactions.get_all_by_date()?;

        let metadata = ExportMetadata {
            account_count: accounts.len(),
            card_count: cards.len(),
            series_count: series.len(),
            transaction_count: transactions.len(),
            earliest_transaction: transactions.first().map(|t| t.date.to_string()),
            latest_transaction: transactions.last().map(|t| t.date.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            accounts,
            cards,
            series,
            transactions,
            metadata,
        })
    }

    /// Check the schema version and that every payment source resolves
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let account_ids: HashSet<_> = self.accounts.iter().map(|a| a.id).collect();
        let card_ids: HashSet<_> = self.cards.iter().map(|c| c.id).collect();
        let known = |source: PaymentSource| match source {
            PaymentSource::Account(id) => account_ids.contains(&id),
            PaymentSource::Card(id) => card_ids.contains(&id),
        };

        for txn in &self.transactions {
            if !known(txn.source) {
                return Err(format!(
                    "Transaction {} references unknown source {}",
                    txn.id, txn.source
                ));
            }
        }

        for series in &self.series {
            if !known(series.config.source) {
                return Err(format!(
                    "Series {} references unknown source {}",
                    series.id, series.config.source
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> CycleResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| CycleError::Export(e.to_string()))
}

/// Parse and validate a JSON export
pub fn read_json_export(json_str: &str) -> CycleResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| CycleError::Export(e.to_string()))?;
    export.validate().map_err(CycleError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CyclePaths;
    use crate::cycle::{DurationPolicy, RecurrenceInterval};
    use crate::models::{AccountType, CardId, Money, SeriesConfig};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn populate(storage: &Storage) {
        let account = Account::new("Checking", AccountType::Checking);
        let card = CreditCard::new("Visa", 7, 20);
        storage
            .transactions
            .upsert(Transaction::new(
                PaymentSource::Account(account.id),
                date(2024, 3, 1),
                Money::from_cents(10000),
            ))
            .unwrap();
        storage
            .transactions
            .upsert(Transaction::new(
                PaymentSource::Card(card.id),
                date(2024, 1, 9),
                Money::from_cents(-2500),
            ))
            .unwrap();
        storage
            .series
            .upsert(RecurringSeries::new(SeriesConfig {
                description: "Gym".into(),
                amount: Money::from_cents(-4000),
                source: PaymentSource::Card(card.id),
                category: None,
                interval: RecurrenceInterval::Month,
                interval_count: 1,
                start_date: date(2024, 1, 1),
                duration: DurationPolicy::FixedMonths { months: 12 },
            }))
            .unwrap();
        storage.accounts.upsert(account).unwrap();
        storage.cards.upsert(card).unwrap();
    }

    #[test]
    fn test_full_export() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.card_count, 1);
        assert_eq!(export.metadata.series_count, 1);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2024-01-09"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2024-03-01"));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_end_date() {
        let (_temp, storage) = create_test_storage();
        populate(&storage);

        let mut output = Vec::new();
        export_full_json(&storage, &mut output, true).unwrap();

        let imported = read_json_export(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(imported.cards[0].name, "Visa");
        assert_eq!(imported.series[0].end_date, Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_validate_detects_dangling_source() {
        let (_temp, storage) = create_test_storage();
        storage
            .transactions
            .upsert(Transaction::new(
                PaymentSource::Card(CardId::new()),
                date(2024, 1, 1),
                Money::from_cents(-1),
            ))
            .unwrap();

        let export = FullExport::from_storage(&storage).unwrap();
        assert!(export.validate().unwrap_err().contains("unknown source"));
    }
}
