//! Monthly statement
//!
//! Groups a month's activity by where the money came from. Account sections
//! hold the transactions dated in the month. Card sections hold the
//! purchases billed on the invoice that closes in the month, which may
//! include purchases dated in the previous month.

use chrono::NaiveDate;

use crate::cycle::YearMonth;
use crate::display::truncate;
use crate::error::CycleResult;
use crate::models::{Money, PaymentSource, Transaction};
use crate::services::CardService;
use crate::storage::Storage;

/// Activity of one account or card within the statement month
#[derive(Debug, Clone)]
pub struct StatementSection {
    pub name: String,
    pub source: PaymentSource,
    /// Invoice closing date (cards only)
    pub closing_date: Option<NaiveDate>,
    /// Invoice due date (cards only)
    pub due_date: Option<NaiveDate>,
    pub transactions: Vec<Transaction>,
    pub total: Money,
}

/// Monthly statement grouped by account and by card invoice
#[derive(Debug, Clone)]
pub struct MonthlyStatement {
    pub month: YearMonth,
    pub accounts: Vec<StatementSection>,
    pub cards: Vec<StatementSection>,
    /// Sum of negative amounts across all sections
    pub total_outflow: Money,
    /// Sum of positive amounts across all sections
    pub total_inflow: Money,
}

impl MonthlyStatement {
    /// Build the statement for `month`. Sections without activity are left out.
    pub fn generate(storage: &Storage, month: YearMonth) -> CycleResult<Self> {
        let in_month = storage
            .transactions
            .get_by_date_range(month.first_day(), month.last_day())?;

        let mut accounts = Vec::new();
        for account in storage.accounts.get_all()? {
            let source = PaymentSource::Account(account.id);
            let transactions: Vec<Transaction> = in_month
                .iter()
                .filter(|t| t.source == source)
                .cloned()
                .collect();

            if transactions.is_empty() {
                continue;
            }

            accounts.push(StatementSection {
                name: account.name,
                source,
                closing_date: None,
                due_date: None,
                total: transactions.iter().map(|t| t.amount).sum(),
                transactions,
            });
        }

        let card_service = CardService::new(storage);
        let mut cards = Vec::new();
        for card in storage.cards.get_all()? {
            let invoice = card_service.invoice(&card, month)?;
            if invoice.transactions.is_empty() {
                continue;
            }

            cards.push(StatementSection {
                name: card.name,
                source: PaymentSource::Card(card.id),
                closing_date: Some(invoice.closing_date),
                due_date: Some(invoice.due_date),
                transactions: invoice.transactions,
                total: invoice.total,
            });
        }

        let (total_outflow, total_inflow) = accounts
            .iter()
            .chain(cards.iter())
            .flat_map(|s| s.transactions.iter())
            .fold((Money::zero(), Money::zero()), |(out, inc), t| {
                if t.is_outflow() {
                    (out + t.amount, inc)
                } else {
                    (out, inc + t.amount)
                }
            });

        Ok(Self {
            month,
            accounts,
            cards,
            total_outflow,
            total_inflow,
        })
    }

    pub fn net(&self) -> Money {
        self.total_inflow + self.total_outflow
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.cards.is_empty()
    }

    /// Format the statement for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Statement for {}\n", self.month));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No activity this month.\n");
            return output;
        }

        if !self.accounts.is_empty() {
            output.push_str("\nACCOUNTS\n");
            for section in &self.accounts {
                output.push_str(&format!("\n{}\n", section.name));
                push_lines(&mut output, section);
            }
        }

        if !self.cards.is_empty() {
            output.push_str("\nCARD INVOICES\n");
            for section in &self.cards {
                output.push_str(&format!("\n{}", section.name));
                if let (Some(closing), Some(due)) = (section.closing_date, section.due_date) {
                    output.push_str(&format!(" (closes {}, due {})", closing, due));
                }
                output.push('\n');
                push_lines(&mut output, section);
            }
        }

        output.push('\n');
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!("{:<58} {:>13}\n", "Total outflow", self.total_outflow));
        output.push_str(&format!("{:<58} {:>13}\n", "Total inflow", self.total_inflow));
        output.push_str(&format!("{:<58} {:>13}\n", "Net", self.net()));

        output
    }
}

fn push_lines(output: &mut String, section: &StatementSection) {
    for txn in &section.transactions {
        output.push_str(&format!(
            "  {}  {:<44} {:>13}\n",
            txn.date,
            truncate(&txn.display_description(), 44),
            txn.amount
        ));
    }
    output.push_str(&format!("  {:<56} {:>13}\n", "Total", section.total));
}
