//! Account CLI commands

use clap::Subcommand;

use crate::display::{format_account_details, format_account_list};
use crate::error::{CycleError, CycleResult};
use crate::models::AccountType;
use crate::services::AccountService;
use crate::storage::Storage;

use super::parse_amount;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (checking, savings, cash, investment, other)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// Starting balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List accounts with balances
    List {
        /// Include archived accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Archive an account
    Archive {
        /// Account name or ID
        account: String,
    },
}

pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> CycleResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                CycleError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: checking, savings, cash, investment, other",
                    account_type
                ))
            })?;
            let starting_balance = parse_amount(&balance)?;

            let account = service.create(&name, account_type, starting_balance)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  Starting Balance: {}", account.starting_balance);
            println!("  ID: {}", account.id);
        }

        AccountCommands::List { all } => {
            let summaries = service.list_with_balances(all)?;
            println!("{}", format_account_list(&summaries));
        }

        AccountCommands::Show { account } => {
            let summary = service.get_summary(service.require(&account)?)?;
            print!("{}", format_account_details(&summary));
        }

        AccountCommands::Archive { account } => {
            let found = service.require(&account)?;
            let archived = service.archive(found.id)?;
            println!("Archived account: {}", archived.name);
        }
    }

    Ok(())
}
