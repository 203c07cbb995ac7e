//! Credit card CLI commands

use clap::Subcommand;

use crate::display::{format_best_card, format_card_details, format_card_list, format_invoice};
use crate::error::CycleResult;
use crate::services::{CardService, CardUpdate};
use crate::storage::Storage;

use super::{parse_amount, parse_date_or_today, parse_month_or};

/// Credit card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Register a credit card
    Add {
        /// Card name
        name: String,
        /// Day of month the invoice closes (1-31)
        #[arg(short, long)]
        closing_day: u32,
        /// Day of month the invoice is due (1-31)
        #[arg(short, long)]
        due_day: u32,
        /// Credit limit (e.g., "5000.00")
        #[arg(short, long)]
        limit: Option<String>,
    },
    /// List cards and where a purchase today would be billed
    List {
        /// Include archived cards
        #[arg(short, long)]
        all: bool,
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show card details
    Show {
        /// Card name or ID
        card: String,
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a card
    Edit {
        /// Card name or ID
        card: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        closing_day: Option<u32>,
        #[arg(short, long)]
        due_day: Option<u32>,
        #[arg(short, long)]
        limit: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Archive a card
    Archive {
        /// Card name or ID
        card: String,
    },
    /// Show an invoice with its purchases
    Invoice {
        /// Card name or ID
        card: String,
        /// Invoice month (YYYY-MM); defaults to the invoice open on --date
        #[arg(short, long)]
        month: Option<String>,
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Pick the card that leaves the most time until payment
    Best {
        /// Purchase date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn handle_card_command(storage: &Storage, cmd: CardCommands) -> CycleResult<()> {
    let service = CardService::new(storage);

    match cmd {
        CardCommands::Add {
            name,
            closing_day,
            due_day,
            limit,
        } => {
            let limit = limit.as_deref().map(parse_amount).transpose()?;
            let card = service.create(&name, closing_day, due_day, limit)?;

            println!("Added card: {}", card);
            println!("  ID: {}", card.id);
        }

        CardCommands::List { all, date } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let cards = service.list(all)?;
            println!("{}", format_card_list(&cards, reference));
        }

        CardCommands::Show { card, date } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let card = service.require(&card)?;
            print!("{}", format_card_details(&card, reference));
        }

        CardCommands::Edit {
            card,
            name,
            closing_day,
            due_day,
            limit,
            notes,
        } => {
            let found = service.require(&card)?;
            let changes = CardUpdate {
                name,
                closing_day,
                due_day,
                credit_limit: limit.as_deref().map(parse_amount).transpose()?,
                notes,
            };

            if changes.name.is_none()
                && changes.closing_day.is_none()
                && changes.due_day.is_none()
                && changes.credit_limit.is_none()
                && changes.notes.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(found.id, changes)?;
            println!("Updated card: {}", updated);
        }

        CardCommands::Archive { card } => {
            let found = service.require(&card)?;
            let archived = service.archive(found.id)?;
            println!("Archived card: {}", archived.name);
        }

        CardCommands::Invoice { card, month, date } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let card = service.require(&card)?;
            let month = match month {
                Some(m) => parse_month_or(Some(m.as_str()), reference)?,
                None => service.invoice_for(&card, reference).invoice_month,
            };
            let invoice = service.invoice(&card, month)?;
            print!("{}", format_invoice(&invoice));
        }

        CardCommands::Best { date } => {
            let reference = parse_date_or_today(date.as_deref())?;
            let best = service.best_card(reference)?;
            println!("{}", format_best_card(best.as_ref(), reference));
        }
    }

    Ok(())
}

