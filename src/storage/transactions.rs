//! Transaction repository
//!
//! Transactions live in `data/transactions.json`. Listings are ordered by
//! transaction date rather than creation time.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CycleError;
use crate::models::{PaymentSource, SeriesId, Transaction, TransactionId};

use super::collection::{Collection, Record};

pub type TransactionRepository = Collection<Transaction>;

impl Record for Transaction {
    type Id = TransactionId;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn sort_by_date(mut txns: Vec<Transaction>) -> Vec<Transaction> {
    // stable sort keeps creation order within a day
    txns.sort_by_key(|t| t.date);
    txns
}

impl Collection<Transaction> {
    /// All transactions, oldest date first
    pub fn get_all_by_date(&self) -> Result<Vec<Transaction>, CycleError> {
        Ok(sort_by_date(self.get_all()?))
    }

    /// Transactions paid from a given account or card
    pub fn get_by_source(&self, source: PaymentSource) -> Result<Vec<Transaction>, CycleError> {
        Ok(sort_by_date(self.filter(|t| t.source == source)?))
    }

    /// Transactions dated within `[start, end]`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, CycleError> {
        Ok(sort_by_date(
            self.filter(|t| t.date >= start && t.date <= end)?,
        ))
    }

    /// Transactions generated from a recurring series
    pub fn get_by_series(&self, series_id: SeriesId) -> Result<Vec<Transaction>, CycleError> {
        Ok(sort_by_date(self.filter(|t| t.series_id == Some(series_id))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, CardId, Money};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_get_by_source_sorted_by_date() {
        let (_temp, repo) = repo();
        let card = PaymentSource::Card(CardId::new());
        let account = PaymentSource::Account(AccountId::new());

        repo.upsert(Transaction::new(card, date(2024, 3, 9), Money::from_cents(-100)))
            .unwrap();
        repo.upsert(Transaction::new(card, date(2024, 3, 1), Money::from_cents(-200)))
            .unwrap();
        repo.upsert(Transaction::new(account, date(2024, 3, 5), Money::from_cents(500)))
            .unwrap();

        let on_card = repo.get_by_source(card).unwrap();
        assert_eq!(on_card.len(), 2);
        assert_eq!(on_card[0].date, date(2024, 3, 1));
        assert_eq!(repo.get_by_source(account).unwrap().len(), 1);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let (_temp, repo) = repo();
        let source = PaymentSource::Account(AccountId::new());
        for day in [1, 15, 31] {
            repo.upsert(Transaction::new(source, date(2024, 1, day), Money::from_cents(-1)))
                .unwrap();
        }

        let found = repo
            .get_by_date_range(date(2024, 1, 1), date(2024, 1, 15))
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_get_by_series() {
        let (_temp, repo) = repo();
        let series_id = SeriesId::new();
        let mut txn = Transaction::new(
            PaymentSource::Card(CardId::new()),
            date(2024, 2, 1),
            Money::from_cents(-999),
        );
        txn.series_id = Some(series_id);
        repo.upsert(txn).unwrap();

        assert_eq!(repo.get_by_series(series_id).unwrap().len(), 1);
        assert!(repo.get_by_series(SeriesId::new()).unwrap().is_empty());
    }
}
