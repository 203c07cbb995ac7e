//! CSV export of transactions
//!
//! One row per transaction. Card purchases also carry the invoice month and
//! due date they are billed on.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{CycleError, CycleResult};
use crate::models::{CardId, CreditCard, PaymentSource};
use crate::storage::Storage;

const HEADER: [&str; 10] = [
    "ID",
    "Date",
    "Source Type",
    "Source",
    "Description",
    "Category",
    "Installment",
    "Amount",
    "Invoice Month",
    "Due Date",
];

/// Export all transactions to CSV, oldest first
pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: W) -> CycleResult<()> {
    let account_names: HashMap<_, _> = storage
        .accounts
        .get_all()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let cards: HashMap<CardId, CreditCard> = storage
        .cards
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(HEADER)
        .map_err(|e| CycleError::Export(e.to_string()))?;

    for txn in storage.transactions.get_all_by_date()? {
        let (kind, name, invoice) = match txn.source {
            PaymentSource::Account(id) => (
                "account",
                account_names.get(&id).cloned().unwrap_or_else(|| "Unknown".into()),
                None,
            ),
            PaymentSource::Card(id) => match cards.get(&id) {
                Some(card) => ("card", card.name.clone(), Some(card.assignment(txn.date))),
                None => ("card", "Unknown".into(), None),
            },
        };

        csv_writer
            .write_record([
                txn.id.to_string(),
                txn.date.to_string(),
                kind.to_string(),
                name,
                txn.description.clone(),
                txn.category.clone().unwrap_or_default(),
                txn.installment.map(|i| i.to_string()).unwrap_or_default(),
                txn.amount.format_with_symbol(""),
                invoice
                    .map(|a| a.invoice_month.to_string())
                    .unwrap_or_default(),
                invoice.map(|a| a.due_date.to_string()).unwrap_or_default(),
            ])
            .map_err(|e| CycleError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CycleError::Export(e.to_string()))
}
