//! CLI commands for data export

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{CycleError, CycleResult};
use crate::export::{
    export_full_json, export_full_yaml, export_transactions_csv, read_json_export,
    read_yaml_export, FullExport,
};
use crate::storage::Storage;

/// Full export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON (machine-readable)
    Json,
    /// YAML (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export accounts, cards, series and transactions to one file
    All {
        /// Output file path
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export transactions to CSV, with the invoice each purchase is billed on
    Transactions {
        /// Output file path
        output: PathBuf,
    },

    /// Read back an export file and check its references
    Verify {
        /// Export file (.json, .yaml or .yml)
        input: PathBuf,
    },

    /// Show what an export would contain
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> CycleResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Json => export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => export_full_yaml(storage, &mut writer)?,
            }
            writer
                .flush()
                .map_err(|e| CycleError::Export(format!("Failed to write {}: {}", output.display(), e)))?;
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Transactions { output } => {
            export_transactions_csv(storage, create_output(&output)?)?;
            let count = storage.transactions.count()?;
            println!("Exported {} transactions to: {}", count, output.display());
        }

        ExportCommands::Verify { input } => {
            let contents = fs::read_to_string(&input).map_err(|e| {
                CycleError::Export(format!("Failed to read {}: {}", input.display(), e))
            })?;

            let export = match input.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => read_yaml_export(&contents)?,
                _ => read_json_export(&contents)?,
            };

            println!("{} is a valid export.", input.display());
            print_summary(&export);
        }

        ExportCommands::Info => {
            let export = FullExport::from_storage(storage)?;
            println!("Schema Version: {}", export.schema_version);
            println!("App Version:    {}", export.app_version);
            print_summary(&export);
        }
    }

    Ok(())
}

fn print_summary(export: &FullExport) {
    let meta = &export.metadata;
    println!("  Accounts:      {}", meta.account_count);
    println!("  Credit cards:  {}", meta.card_count);
    println!("  Series:        {}", meta.series_count);
    println!("  Transactions:  {}", meta.transaction_count);

    if let (Some(earliest), Some(latest)) = (&meta.earliest_transaction, &meta.latest_transaction) {
        println!("  Date range:    {} to {}", earliest, latest);
    }
}

fn create_output(path: &Path) -> CycleResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        CycleError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
