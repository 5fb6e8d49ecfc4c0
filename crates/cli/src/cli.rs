use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Average stock-month alerts for the inventory sheet.
///
/// Reads the inventory sheet from a directory of CSV exports and mails a
/// digest of low-stock items. Settings come from the environment (or a
/// `.env` file); the flags below override them.
#[derive(Parser, Debug)]
#[command(name = "stockmon", version, about)]
pub struct CliArgs {
    /// Print the rendered mail instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Recipient address (overrides STOCKMON_RECIPIENT)
    #[arg(long, global = true)]
    pub to: Option<String>,

    /// Workbook directory of CSV exports (overrides STOCKMON_WORKBOOK_DIR)
    #[arg(long, global = true)]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Low stock among import items (average ≤ 4)
    ImportLowStock,

    /// Low stock among non-import items (average ≤ 2)
    NonImportLowStock,

    /// Run YAML alert definitions (a file or a directory)
    Run {
        /// Definition file or directory (default: STOCKMON_DEFINITIONS_DIR)
        #[arg(long)]
        definition: Option<PathBuf>,

        /// Only run the definition with this id; without definitions,
        /// picks a built-in alert
        #[arg(long)]
        id: Option<String>,
    },

    /// Validate the sheet and report matches without sending mail
    Check {
        /// Only validate this sheet's columns and count its rows
        #[arg(long, conflicts_with = "definition")]
        sheet: Option<String>,

        /// Definition file or directory (default: built-in alerts)
        #[arg(long)]
        definition: Option<PathBuf>,
    },

    /// Print the built-in alert definitions as YAML
    Presets,

    /// Print the effective configuration (secrets redacted)
    Config,
}
