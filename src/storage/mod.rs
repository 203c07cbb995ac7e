//! Storage layer for cardcycle
//!
//! One JSON file per entity kind under `data/`, written atomically, plus the
//! append-only audit log. Services go through [`Storage`] for both.

pub mod accounts;
pub mod cards;
pub mod collection;
pub mod file_io;
pub mod init;
pub mod series;
pub mod transactions;

pub use accounts::AccountRepository;
pub use cards::CardRepository;
pub use collection::{Collection, Record};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use series::SeriesRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::CyclePaths;
use crate::error::CycleError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: CyclePaths,
    pub accounts: AccountRepository,
    pub cards: CardRepository,
    pub series: SeriesRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: CyclePaths) -> Result<Self, CycleError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            cards: CardRepository::new(paths.cards_file()),
            series: SeriesRepository::new(paths.series_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &CyclePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), CycleError> {
        self.accounts.load()?;
        self.cards.load()?;
        self.series.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), CycleError> {
        self.accounts.save()?;
        self.cards.save()?;
        self.series.save()?;
        self.transactions.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), CycleError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update, attaching a field diff of the two states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), CycleError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), CycleError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Log several entries at once, e.g. the parts of an installment purchase
    pub fn log_batch(&self, entries: &[AuditEntry]) -> Result<(), CycleError> {
        self.audit.log_batch(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::CreditCard;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_and_load_all() {
        let (temp_dir, storage) = create_test_storage();
        storage.cards.upsert(CreditCard::new("Visa", 7, 20)).unwrap();
        storage.save_all().unwrap();

        let paths = CyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.cards.count().unwrap(), 1);
        assert_eq!(reopened.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_log_update_records_diff() {
        let (_temp, storage) = create_test_storage();
        let before = CreditCard::new("Visa", 7, 20);
        let mut after = before.clone();
        after.closing_day = 10;

        storage
            .log_update(
                EntityType::CreditCard,
                before.id.to_string(),
                Some(before.name.clone()),
                &before,
                &after,
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("closing_day: 7 -> 10")
        );
    }
}
