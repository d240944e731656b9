//! Contract CLI commands

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_contract_details, format_contract_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BillingTerms, BillingType, ClientId};
use crate::services::{ClientService, ContractService, NewContract};
use crate::storage::Storage;

use super::{confirm, parse_money, parse_optional_date};

/// Contract subcommands
#[derive(Subcommand)]
pub enum ContractCommands {
    /// Add a contract for a client
    Add {
        /// Contract name
        name: String,
        /// Client name or ID
        #[arg(short, long)]
        client: String,
        /// Billing model: hourly, retainer or fixed
        #[arg(short, long, default_value = "hourly")]
        billing: String,
        /// Hourly rate (hourly contracts)
        #[arg(short, long)]
        rate: Option<String>,
        /// Monthly fee (retainer) or total price (fixed)
        #[arg(short, long)]
        price: Option<String>,
        /// Start date (defaults to today)
        #[arg(long)]
        start: Option<String>,
        /// End date
        #[arg(long)]
        end: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List contracts
    List {
        /// Only active contracts
        #[arg(short, long)]
        active: bool,
        /// Only contracts of this client
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Show contract details
    Show {
        /// Contract name or ID
        contract: String,
    },
    /// Mark a contract inactive
    Deactivate {
        /// Contract name or ID
        contract: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle a contract command
pub fn handle_contract_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ContractCommands,
) -> LedgerResult<()> {
    let service = ContractService::new(storage);
    let clients = ClientService::new(storage);
    let client_name = |id: ClientId| -> LedgerResult<String> {
        Ok(clients
            .get(id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "(unknown client)".to_string()))
    };

    match cmd {
        ContractCommands::Add {
            name,
            client,
            billing,
            rate,
            price,
            start,
            end,
            notes,
        } => {
            let client = clients.require(&client)?;
            let billing_type = BillingType::parse(&billing).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Unknown billing type '{}' (expected hourly, retainer or fixed)",
                    billing
                ))
            })?;
            let rate = rate.as_deref().map(parse_money).transpose()?;
            let price = price.as_deref().map(parse_money).transpose()?;

            let contract = service.create(NewContract {
                name,
                client_id: client.id,
                billing: BillingTerms::from_parts(billing_type, rate, price),
                start_date: parse_optional_date(start.as_deref())?
                    .unwrap_or_else(|| Utc::now().date_naive()),
                end_date: parse_optional_date(end.as_deref())?,
                notes: notes.unwrap_or_default(),
            })?;

            println!("Created contract: {}", contract.name);
            println!("  ID:      {}", contract.id);
            println!("  Client:  {}", client.name);
            println!("  Billing: {}", contract.billing.describe(&settings.currency_symbol));
        }

        ContractCommands::List { active, client } => {
            let contracts = match client {
                Some(client) => {
                    let client = clients.require(&client)?;
                    let mut contracts = service.list_for_client(client.id)?;
                    if active {
                        contracts.retain(|c| c.active);
                    }
                    contracts
                }
                None => service.list(active)?,
            };

            let mut rows = Vec::with_capacity(contracts.len());
            for contract in contracts {
                let name = client_name(contract.client_id)?;
                rows.push((contract, name));
            }
            println!(
                "{}",
                format_contract_list(&rows, &settings.currency_symbol, &settings.date_format)
            );
        }

        ContractCommands::Show { contract } => {
            let contract = service.require(&contract)?;
            let name = client_name(contract.client_id)?;
            let details = format_contract_details(
                &contract,
                &name,
                &settings.currency_symbol,
                &settings.date_format,
            );
            print!("{}", details);
        }

        ContractCommands::Deactivate { contract, yes } => {
            let contract = service.require(&contract)?;
            if !contract.active {
                println!("Contract '{}' is already inactive", contract.name);
                return Ok(());
            }
            if !confirm(&format!("Deactivate contract '{}'?", contract.name), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            let updated = service.deactivate(contract.id)?;
            println!("Deactivated contract: {}", updated.name);
        }
    }

    Ok(())
}
