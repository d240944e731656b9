//! Time tracking CLI commands

use std::collections::HashMap;

use chrono::{Duration, NaiveTime, Utc};
use clap::Subcommand;
use dialoguer::Select;

use crate::config::settings::Settings;
use crate::display::{format_date, format_session_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Contract, ContractId};
use crate::services::{ContractService, SessionService};
use crate::storage::Storage;

use super::parse_optional_date;

/// Session subcommands
#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a timer on a contract (prompts when no contract is given)
    Start {
        /// Contract name or ID
        contract: Option<String>,
        /// Record the time as non-billable
        #[arg(long)]
        non_billable: bool,
        /// What the session is for
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Stop the running timer
    Stop,
    /// Log a completed session
    Log {
        /// Contract name or ID
        contract: String,
        /// Hours worked
        hours: f64,
        /// Day the work happened (defaults to ending now)
        #[arg(short, long)]
        date: Option<String>,
        /// Record the time as non-billable
        #[arg(long)]
        non_billable: bool,
        /// What the session was for
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List sessions
    List {
        /// Only sessions of this contract
        #[arg(short, long)]
        contract: Option<String>,
        /// Number of sessions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a session command
pub fn handle_session_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SessionCommands,
) -> LedgerResult<()> {
    let service = SessionService::new(storage);
    let contracts = ContractService::new(storage);

    match cmd {
        SessionCommands::Start {
            contract,
            non_billable,
            notes,
        } => {
            let contract = match contract {
                Some(identifier) => contracts.require(&identifier)?,
                None => select_contract(contracts.list(true)?, &settings.currency_symbol)?,
            };
            let session = service.start(contract.id, !non_billable, notes, Utc::now())?;
            println!(
                "Started timer on '{}' at {}",
                contract.name,
                session.start.format("%H:%M")
            );
        }

        SessionCommands::Stop => {
            let session = service.stop(Utc::now())?;
            let name = contracts
                .get(session.contract_id)?
                .map(|c| c.name)
                .unwrap_or_default();
            println!(
                "Stopped timer on '{}': {:.2}h",
                name,
                session.hours.unwrap_or_default()
            );
        }

        SessionCommands::Log {
            contract,
            hours,
            date,
            non_billable,
            notes,
        } => {
            let contract = contracts.require(&contract)?;
            let start = match parse_optional_date(date.as_deref())? {
                Some(day) => day.and_time(NaiveTime::MIN).and_utc(),
                None => Utc::now() - Duration::seconds((hours * 3600.0).round() as i64),
            };
            let session = service.log(contract.id, start, hours, !non_billable, notes)?;
            println!(
                "Logged {:.2}h on '{}' ({})",
                hours,
                contract.name,
                format_date(session.start.date_naive(), &settings.date_format)
            );
        }

        SessionCommands::List { contract, limit } => {
            let contract_id = contract
                .map(|c| contracts.require(&c).map(|c| c.id))
                .transpose()?;

            let names: HashMap<ContractId, String> = contracts
                .list(false)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();

            let rows: Vec<_> = service
                .list(contract_id)?
                .into_iter()
                .take(limit)
                .map(|s| {
                    let name = names.get(&s.contract_id).cloned().unwrap_or_default();
                    (s, name)
                })
                .collect();
            println!("{}", format_session_list(&rows, &settings.date_format));
        }
    }

    Ok(())
}

fn select_contract(mut active: Vec<Contract>, currency: &str) -> LedgerResult<Contract> {
    if active.is_empty() {
        return Err(LedgerError::Validation(
            "No active contracts; add one with 'freelance contract add'".into(),
        ));
    }

    let items: Vec<String> = active
        .iter()
        .map(|c| format!("{} ({})", c.name, c.billing.describe(currency)))
        .collect();
    let choice = Select::new()
        .with_prompt("Contract")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(active.swap_remove(choice))
}
