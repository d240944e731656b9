//! CLI commands for reports
//!
//! Reports print to the terminal, or to a CSV file with `--output`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::{DashboardReport, GoalsReport};
use crate::services::InvoiceService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Normalized monthly revenue across active contracts
    #[command(alias = "dash")]
    Dashboard {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Progress toward income goals
    Goals {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let now = Utc::now();

    match cmd {
        ReportCommands::Dashboard { output } => {
            InvoiceService::new(storage).refresh_overdue(now.date_naive())?;
            let report = DashboardReport::generate(storage, settings, now)?;

            if let Some(path) = output {
                report.export_csv(create_output(&path)?, &settings.currency_symbol)?;
                println!("Dashboard exported to: {}", path.display());
            } else {
                print!(
                    "{}",
                    report.format_terminal(&settings.currency_symbol, &settings.date_format)
                );
            }
        }

        ReportCommands::Goals { output } => {
            let report = GoalsReport::generate(storage, now)?;

            if let Some(path) = output {
                report.export_csv(create_output(&path)?, &settings.date_format)?;
                println!("Goals report exported to: {}", path.display());
            } else {
                print!(
                    "{}",
                    report.format_terminal(&settings.currency_symbol, &settings.date_format)
                );
            }
        }
    }

    Ok(())
}

fn create_output(path: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
