//! Credit card display formatting

use chrono::NaiveDate;

use crate::cycle::InvoiceAssignment;
use crate::models::CreditCard;
use crate::services::Invoice;

use super::truncate;

/// Format cards as a table, showing where a purchase on `reference` lands
pub fn format_card_list(cards: &[CreditCard], reference: NaiveDate) -> String {
    if cards.is_empty() {
        return "No credit cards found.".to_string();
    }

    let name_width = cards
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>6}  {:>4}  {:>12}  {:<8}  {:<10}  {:>5}  {}\n",
        "Name", "Closes", "Due", "Limit", "Invoice", "Due Date", "Days", "Status",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->6}  {:->4}  {:->12}  {:-<8}  {:-<10}  {:->5}  {:-<8}\n",
        "", "", "", "", "", "", "", "",
    ));

    for card in cards {
        let assignment = card.assignment(reference);
        let limit = card
            .credit_limit
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "{:<name_width$}  {:>6}  {:>4}  {:>12}  {:<8}  {:<10}  {:>5}  {}\n",
            card.name,
            card.closing_day,
            card.due_day,
            limit,
            assignment.invoice_month,
            assignment.due_date.to_string(),
            assignment.days_until_due,
            if card.archived { "Archived" } else { "" },
        ));
    }

    output
}

/// Format a single card with the invoice a purchase on `reference` goes to
pub fn format_card_details(card: &CreditCard, reference: NaiveDate) -> String {
    let assignment = card.assignment(reference);
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", card.name));
    output.push_str(&format!("  ID:           {}\n", card.id));
    output.push_str(&format!("  Closing Day:  {}\n", card.closing_day));
    output.push_str(&format!("  Due Day:      {}\n", card.due_day));
    if let Some(limit) = card.credit_limit {
        output.push_str(&format!("  Credit Limit: {}\n", limit));
    }
    output.push_str(&format!(
        "  Archived:     {}\n",
        if card.archived { "Yes" } else { "No" }
    ));

    output.push('\n');
    output.push_str(&format!("  Purchases on {}:\n", reference));
    output.push_str(&format!("    Invoice:    {}\n", assignment.invoice_month));
    output.push_str(&format!(
        "    Due:        {} ({})\n",
        assignment.due_date,
        describe_days(assignment.days_until_due)
    ));

    if !card.notes.is_empty() {
        output.push_str(&format!("\n  Notes: {}\n", card.notes));
    }

    output
}

/// Format one invoice with its purchases
pub fn format_invoice(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} invoice {}\n", invoice.card.name, invoice.month));
    output.push_str(&format!(
        "  Purchases {} to {}\n",
        invoice.window.0, invoice.window.1
    ));
    output.push_str(&format!("  Closes {}, due {}\n\n", invoice.closing_date, invoice.due_date));

    if invoice.transactions.is_empty() {
        output.push_str("  No purchases on this invoice.\n");
    }

    for txn in &invoice.transactions {
        output.push_str(&format!(
            "  {}  {:<40}  {:>12}\n",
            txn.date,
            truncate(&txn.display_description(), 40),
            txn.amount
        ));
    }

    output.push_str(&format!("  {:<52}  {:>12}\n", "Total", invoice.total));

    output
}

/// Format the result of a best-card lookup
pub fn format_best_card(
    best: Option<&(CreditCard, InvoiceAssignment)>,
    reference: NaiveDate,
) -> String {
    match best {
        Some((card, assignment)) => format!(
            "Best card for {}: {}\n  Invoice {}, due {} ({})\n",
            reference,
            card.name,
            assignment.invoice_month,
            assignment.due_date,
            describe_days(assignment.days_until_due)
        ),
        None => "No active credit cards.".to_string(),
    }
}

fn describe_days(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        d if d < 0 => format!("{} days ago", -d),
        d => format!("in {} days", d),
    }
}
