use anyhow::Result;
use clap::{Parser, Subcommand};

use cardcycle::cli::{
    handle_account_command, handle_card_command, handle_export_command, handle_report_command,
    handle_series_command, handle_transaction_command, AccountCommands, CardCommands,
    ExportCommands, ReportCommands, SeriesCommands, TransactionCommands,
};
use cardcycle::config::{CyclePaths, Settings};
use cardcycle::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "cardcycle",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based credit card and recurring expense tracker",
    long_about = "cardcycle tracks purchases on credit cards and accounts, tells you \
                  which invoice a purchase lands on and when it is due, and projects \
                  subscriptions and other recurring charges forward in time."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Bank account commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Credit card and invoice commands
    #[command(subcommand)]
    Card(CardCommands),

    /// Recurring series commands
    #[command(subcommand, alias = "recurring")]
    Series(SeriesCommands),

    /// Transaction commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = CyclePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing cardcycle at: {}", paths.base_dir().display());
            if initialize_storage(&paths)? {
                println!("Initialization complete!");
                println!();
                println!("Next steps:");
                println!("  cardcycle card add \"Visa\" --closing-day 7 --due-day 15");
                println!("  cardcycle card best");
            } else {
                println!("Already initialized; missing data files were recreated.");
            }
        }
        Some(Commands::Config) => {
            println!("cardcycle Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Upcoming window: {} days", settings.upcoming_days);
        }
        Some(Commands::Account(cmd)) => handle_account_command(&storage, cmd)?,
        Some(Commands::Card(cmd)) => handle_card_command(&storage, cmd)?,
        Some(Commands::Series(cmd)) => handle_series_command(&storage, &settings, cmd)?,
        Some(Commands::Txn(cmd)) => handle_transaction_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { count }) => {
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("cardcycle - credit card and recurring expense tracker");
            println!();
            println!("Run 'cardcycle --help' for usage information.");
        }
    }

    Ok(())
}
