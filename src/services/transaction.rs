//! Transaction service
//!
//! Purchases against accounts and cards, installment purchases split across
//! successive monthly invoices, listing and deletion.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::cycle::add_months;
use crate::error::{CycleError, CycleResult};
use crate::models::{
    CardId, Installment, Money, PaymentSource, Transaction, TransactionId,
};
use crate::storage::Storage;

use super::ensure_source_usable;

/// Upper bound on the number of installments of one purchase
pub const MAX_INSTALLMENTS: u32 = 72;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub source: Option<PaymentSource>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Keep only the most recent `limit` transactions
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: PaymentSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.source.map_or(true, |s| txn.source == s)
            && self.start_date.map_or(true, |d| txn.date >= d)
            && self.end_date.map_or(true, |d| txn.date <= d)
    }
}

/// Input for a single purchase or deposit
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub source: PaymentSource,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category: Option<String>,
}

/// Input for a card purchase paid in monthly installments
#[derive(Debug, Clone)]
pub struct InstallmentPurchase {
    pub card_id: CardId,
    /// Purchase date; installment `n` is dated `n - 1` months later
    pub date: NaiveDate,
    /// Total amount, split evenly across installments
    pub total: Money,
    pub count: u32,
    pub description: String,
    pub category: Option<String>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a single transaction
    pub fn create(&self, input: CreateTransactionInput) -> CycleResult<Transaction> {
        ensure_source_usable(self.storage, input.source)?;

        let mut txn =
            Transaction::with_description(input.source, input.date, input.amount, input.description.trim());
        txn.category = normalize_category(input.category);

        txn.validate()
            .map_err(|e| CycleError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.display_description()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Record a card purchase as `count` monthly installments
    ///
    /// Each installment falls on the purchase day of a successive month
    /// (clamped to the month's last day), so consecutive installments land
    /// on consecutive invoices.
    pub fn create_installments(&self, input: InstallmentPurchase) -> CycleResult<Vec<Transaction>> {
        let source = PaymentSource::Card(input.card_id);
        ensure_source_usable(self.storage, source)?;

        if !(1..=MAX_INSTALLMENTS).contains(&input.count) {
            return Err(CycleError::Validation(format!(
                "Installment count must be between 1 and {} (got {})",
                MAX_INSTALLMENTS, input.count
            )));
        }

        let description = input.description.trim().to_string();
        let category = normalize_category(input.category);
        let amounts = input.total.split_even(input.count);

        let mut txns = Vec::with_capacity(amounts.len());
        for (i, amount) in (0..input.count).zip(amounts) {
            let mut txn = Transaction::with_description(
                source,
                add_months(input.date, i),
                amount,
                description.clone(),
            );
            txn.category = category.clone();
            txn.installment = Some(Installment {
                number: i + 1,
                total: input.count,
            });
            txn.validate()
                .map_err(|e| CycleError::Validation(e.to_string()))?;
            txns.push(txn);
        }

        self.storage.transactions.upsert_many(txns.clone())?;
        self.storage.transactions.save()?;

        let entries: Vec<AuditEntry> = txns
            .iter()
            .map(|txn| {
                AuditEntry::create(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(txn.display_description()),
                    txn,
                )
            })
            .collect();
        self.storage.log_batch(&entries)?;

        Ok(txns)
    }

    pub fn get(&self, id: TransactionId) -> CycleResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or short display ID
    pub fn find(&self, identifier: &str) -> CycleResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        self.storage
            .transactions
            .find(|t| t.id.matches_short(identifier))
    }

    /// Transactions matching `filter`, oldest date first
    pub fn list(&self, filter: &TransactionFilter) -> CycleResult<Vec<Transaction>> {
        let mut txns: Vec<Transaction> = self
            .storage
            .transactions
            .get_all_by_date()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        if let Some(limit) = filter.limit {
            let skip = txns.len().saturating_sub(limit);
            txns.drain(..skip);
        }

        Ok(txns)
    }

    pub fn delete(&self, id: TransactionId) -> CycleResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .remove(id)?
            .ok_or_else(|| CycleError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.display_description()),
            &txn,
        )?;

        Ok(txn)
    }
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
