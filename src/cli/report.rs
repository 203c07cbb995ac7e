//! CLI commands for reports

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Subcommand;

use crate::error::{CycleError, CycleResult};
use crate::reports::{CashFlowReport, MonthlyStatement};
use crate::storage::Storage;

use super::parse_month_or;

/// Months covered by `report cash-flow` when `--from` is omitted
const DEFAULT_CASH_FLOW_MONTHS: u32 = 6;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Account activity and card invoices for one month
    Statement {
        /// Month (YYYY-MM, default current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Monthly inflow and outflow over a range of months
    #[command(alias = "cashflow")]
    CashFlow {
        /// First month (YYYY-MM, default five months before --to)
        #[arg(short, long)]
        from: Option<String>,

        /// Last month (YYYY-MM, default current month)
        #[arg(short, long)]
        to: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> CycleResult<()> {
    let today = Local::now().date_naive();

    match cmd {
        ReportCommands::Statement { month } => {
            let month = parse_month_or(month.as_deref(), today)?;
            let statement = MonthlyStatement::generate(storage, month)?;
            print!("{}", statement.format_terminal());
        }

        ReportCommands::CashFlow { from, to, output } => {
            let to = parse_month_or(to.as_deref(), today)?;
            let from = match from {
                Some(from) => parse_month_or(Some(from.as_str()), today)?,
                None => (1..DEFAULT_CASH_FLOW_MONTHS).fold(to, |m, _| m.prev()),
            };

            let report = CashFlowReport::generate(storage, from, to)?;

            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Cash flow report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}

fn create_output(path: &Path) -> CycleResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        CycleError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
