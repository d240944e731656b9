//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod client;
pub mod contract;
pub mod expense;
pub mod goal;
pub mod import;
pub mod invoice;
pub mod report;
pub mod session;

pub use client::{handle_client_command, ClientCommands};
pub use contract::{handle_contract_command, ContractCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::handle_import_command;
pub use invoice::{handle_invoice_command, InvoiceCommands};
pub use report::{handle_report_command, ReportCommands};
pub use session::{handle_session_command, SessionCommands};

use chrono::NaiveDate;
use dialoguer::Confirm;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::services::parse_date;

/// Parse a money argument such as "120", "1,250.50" or "$80"
pub(crate) fn parse_money(text: &str) -> LedgerResult<Money> {
    Money::parse(text).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Parse an optional date argument, accepting the same formats as import
pub(crate) fn parse_optional_date(text: Option<&str>) -> LedgerResult<Option<NaiveDate>> {
    text.map(parse_date).transpose()
}

/// Ask before a destructive change unless `--yes` was given
pub(crate) fn confirm(prompt: &str, yes: bool) -> LedgerResult<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
