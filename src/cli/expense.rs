//! Expense CLI commands

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_category_totals, format_date, format_expense_list};
use crate::error::LedgerResult;
use crate::services::{parse_category, ClientService, ExpenseService};
use crate::storage::Storage;

use super::{handle_import_command, parse_money, parse_optional_date};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount spent
        amount: String,
        /// Category or free text to classify (e.g. "software", "Uber ride")
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Date of the expense (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Client the expense is billable to
        #[arg(long)]
        client: Option<String>,
    },
    /// List expenses
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// From date (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// To date (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Show totals per category instead of individual expenses
        #[arg(short, long)]
        totals: bool,
    },
    /// Import expenses from a CSV file
    Import {
        /// Path to CSV file with a header row
        file: PathBuf,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            description,
            client,
        } => {
            let client_id = client
                .map(|c| ClientService::new(storage).require(&c).map(|c| c.id))
                .transpose()?;
            let date = parse_optional_date(date.as_deref())?.unwrap_or_else(|| Utc::now().date_naive());

            let expense = service.add(
                date,
                parse_money(&amount)?,
                parse_category(&category),
                &description,
                client_id,
            )?;
            println!(
                "Recorded {} expense: {} on {}",
                expense.category,
                expense.amount.format_with_symbol(currency),
                format_date(expense.date, &settings.date_format)
            );
        }

        ExpenseCommands::List {
            category,
            from,
            to,
            totals,
        } => {
            let from = parse_optional_date(from.as_deref())?;
            let to = parse_optional_date(to.as_deref())?;

            if totals {
                let totals = service.totals_by_category(from, to)?;
                println!("{}", format_category_totals(&totals, currency));
            } else {
                let category = category.as_deref().map(parse_category);
                let expenses = service.list(category, from, to)?;
                println!("{}", format_expense_list(&expenses, currency, &settings.date_format));
            }
        }

        ExpenseCommands::Import { file } => handle_import_command(storage, &file)?,
    }

    Ok(())
}
