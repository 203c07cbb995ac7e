//! Transaction display formatting

use crate::cycle::InvoiceAssignment;
use crate::models::{Money, Transaction};

use super::truncate;

fn format_transaction_row(txn: &Transaction, source: &str) -> String {
    // marks transactions posted from a recurring series
    let marker = if txn.series_id.is_some() { "R" } else { " " };

    format!(
        "{} {:<13} {} {:<16} {:<30} {:<14} {:>12}",
        marker,
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        truncate(source, 16),
        truncate(&txn.display_description(), 30),
        truncate(txn.category.as_deref().unwrap_or(""), 14),
        txn.amount
    )
}

/// Format transactions as a register, each paired with its source name
pub fn format_transaction_register(rows: &[(Transaction, String)]) -> String {
    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<13} {:<10} {:<16} {:<30} {:<14} {:>12}\n",
        "ID", "Date", "Source", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(104));
    output.push('\n');

    for (txn, source) in rows {
        output.push_str(&format_transaction_row(txn, source));
        output.push('\n');
    }

    let total: Money = rows.iter().map(|(t, _)| t.amount).sum();
    output.push_str(&"-".repeat(104));
    output.push('\n');
    output.push_str(&format!("  {:<88} {:>12}\n", "Total", total));

    output
}

/// Format a single transaction's details
///
/// `invoice` is the card invoice the transaction is billed on, if any.
pub fn format_transaction_details(
    txn: &Transaction,
    source: &str,
    invoice: Option<InvoiceAssignment>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:        {}\n", txn.date));
    output.push_str(&format!("  Amount:      {}\n", txn.amount));
    output.push_str(&format!("  Source:      {}\n", source));

    if !txn.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", txn.description));
    }
    if let Some(category) = &txn.category {
        output.push_str(&format!("  Category:    {}\n", category));
    }
    if let Some(installment) = txn.installment {
        output.push_str(&format!("  Installment: {}\n", installment));
    }
    if let Some(series_id) = txn.series_id {
        output.push_str(&format!("  Series:      {}\n", series_id));
    }
    if let Some(assignment) = invoice {
        output.push_str(&format!(
            "  Invoice:     {} (due {})\n",
            assignment.invoice_month, assignment.due_date
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreditCard, Installment, PaymentSource, SeriesId};
    use chrono::NaiveDate;

    fn purchase() -> (CreditCard, Transaction) {
        let card = CreditCard::new("Visa", 10, 20);
        let mut txn = Transaction::with_description(
            PaymentSource::Card(card.id),
            NaiveDate::from_ymd_opt(2024, 4, 12).unwrap(),
            Money::from_cents(-25000),
            "Bike",
        );
        txn.installment = Some(Installment { number: 2, total: 4 });
        (card, txn)
    }

    #[test]
    fn test_register() {
        let (_, mut txn) = purchase();
        txn.series_id = Some(SeriesId::new());
        let output = format_transaction_register(&[(txn, "Visa".to_string())]);

        assert!(output.contains("Bike (2/4)"));
        assert!(output.contains("2024-04-12"));
        assert!(output.contains("\nR txn-"));
        assert!(output.contains("-$250.00"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[]), "No transactions found.\n");
    }

    #[test]
    fn test_details_show_invoice() {
        let (card, txn) = purchase();
        let output = format_transaction_details(&txn, &card.name, Some(card.assignment(txn.date)));

        assert!(output.contains("Installment: 2/4"));
        assert!(output.contains("Invoice:     2024-05 (due 2024-05-20)"));
    }
}
