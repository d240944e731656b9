//! Client CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_client_details, format_client_list};
use crate::error::LedgerResult;
use crate::services::{ClientService, ContractService};
use crate::storage::Storage;

use super::confirm;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a new client
    Add {
        /// Client name
        name: String,
        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List clients
    List {
        /// Include archived clients
        #[arg(short, long)]
        all: bool,
    },
    /// Show client details and contracts
    Show {
        /// Client name or ID
        client: String,
    },
    /// Archive a client
    Archive {
        /// Client name or ID
        client: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle a client command
pub fn handle_client_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ClientCommands,
) -> LedgerResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Add { name, email, notes } => {
            let client = service.create(&name, email, notes)?;
            println!("Created client: {}", client.name);
            println!("  ID: {}", client.id);
        }

        ClientCommands::List { all } => {
            let clients = service.list(all)?;
            println!("{}", format_client_list(&clients));
        }

        ClientCommands::Show { client } => {
            let client = service.require(&client)?;
            let contracts = ContractService::new(storage).list_for_client(client.id)?;
            let details = format_client_details(
                &client,
                &contracts,
                &settings.currency_symbol,
                &settings.date_format,
            );
            print!("{}", details);
        }

        ClientCommands::Archive { client, yes } => {
            let client = service.require(&client)?;
            if client.archived {
                println!("Client '{}' is already archived", client.name);
                return Ok(());
            }
            if !confirm(&format!("Archive client '{}'?", client.name), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            let archived = service.archive(client.id)?;
            println!("Archived client: {}", archived.name);
        }
    }

    Ok(())
}
