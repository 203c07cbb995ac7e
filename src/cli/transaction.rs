//! Transaction CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{CycleError, CycleResult};
use crate::models::PaymentSource;
use crate::services::{
    source_name, CardService, CreateTransactionInput, InstallmentPurchase, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_date_or_today, resolve_source};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a purchase, payment or deposit
    Add {
        /// Amount; negative for purchases (e.g., "-42.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Credit card used
        #[arg(long, conflicts_with = "account")]
        card: Option<String>,
        /// Account used
        #[arg(long)]
        account: Option<String>,
        /// Transaction date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long, default_value = "")]
        description: String,
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// Record a card purchase split into monthly installments
    Installments {
        /// Card name or ID
        card: String,
        /// Total amount; negative for purchases
        #[arg(allow_hyphen_values = true)]
        total: String,
        /// Number of installments
        count: u32,
        /// Purchase date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long, default_value = "")]
        description: String,
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// List transactions
    List {
        #[arg(long, conflicts_with = "account")]
        card: Option<String>,
        #[arg(long)]
        account: Option<String>,
        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Show only the most recent N transactions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

pub fn handle_transaction_command(storage: &Storage, cmd: TransactionCommands) -> CycleResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            card,
            account,
            date,
            description,
            category,
        } => {
            let source = resolve_source(storage, card.as_deref(), account.as_deref())?;
            let txn = service.create(CreateTransactionInput {
                source,
                date: parse_date_or_today(date.as_deref())?,
                amount: parse_amount(&amount)?,
                description,
                category,
            })?;

            println!("Recorded transaction {}", txn.id);
            println!("  {}  {}  {}", txn.date, txn.display_description(), txn.amount);
            if let PaymentSource::Card(card_id) = txn.source {
                if let Some(card) = CardService::new(storage).get(card_id)? {
                    let assignment = card.assignment(txn.date);
                    println!(
                        "  Billed on the {} invoice of {} (due {})",
                        assignment.invoice_month, card.name, assignment.due_date
                    );
                }
            }
        }

        TransactionCommands::Installments {
            card,
            total,
            count,
            date,
            description,
            category,
        } => {
            let card = CardService::new(storage).require(&card)?;
            let txns = service.create_installments(InstallmentPurchase {
                card_id: card.id,
                date: parse_date_or_today(date.as_deref())?,
                total: parse_amount(&total)?,
                count,
                description,
                category,
            })?;

            println!("Recorded {} installment(s) on {}:", txns.len(), card.name);
            for txn in &txns {
                let assignment = card.assignment(txn.date);
                println!(
                    "  {}  {:>12}  invoice {}  due {}",
                    txn.date, txn.amount, assignment.invoice_month, assignment.due_date
                );
            }
        }

        TransactionCommands::List {
            card,
            account,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new();

            if card.is_some() || account.is_some() {
                filter = filter.source(resolve_source(storage, card.as_deref(), account.as_deref())?);
            }

            if from.is_some() || to.is_some() {
                let start = from.as_deref().map(parse_date).transpose()?;
                let end = to.as_deref().map(parse_date).transpose()?;
                let start = start.unwrap_or(NaiveDate::MIN);
                let end = end.unwrap_or(NaiveDate::MAX);
                if start > end {
                    return Err(CycleError::Validation(format!(
                        "--from ({}) is after --to ({})",
                        start, end
                    )));
                }
                filter = filter.date_range(start, end);
            }

            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let rows = service
                .list(&filter)?
                .into_iter()
                .map(|txn| {
                    let source = source_name(storage, txn.source)?;
                    Ok((txn, source))
                })
                .collect::<CycleResult<Vec<_>>>()?;

            print!("{}", format_transaction_register(&rows));
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| CycleError::transaction_not_found(&id))?;
            let source = source_name(storage, txn.source)?;
            let invoice = match txn.source {
                PaymentSource::Card(card_id) => CardService::new(storage)
                    .get(card_id)?
                    .map(|card| card.assignment(txn.date)),
                PaymentSource::Account(_) => None,
            };

            print!("{}", format_transaction_details(&txn, &source, invoice));
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| CycleError::transaction_not_found(&id))?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {}", deleted);
        }
    }

    Ok(())
}
