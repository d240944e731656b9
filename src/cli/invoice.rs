//! Invoice CLI commands

use std::collections::HashMap;

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_date, format_invoice_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ClientId, InvoiceStatus};
use crate::services::{ClientService, ContractService, InvoiceService};
use crate::storage::Storage;

use super::{confirm, parse_money, parse_optional_date};

/// Invoice subcommands
#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// Create a pending invoice
    Create {
        /// Client name or ID
        client: String,
        /// Invoice amount
        amount: String,
        /// Contract the invoice bills for
        #[arg(short, long)]
        contract: Option<String>,
        /// Issue date (defaults to today)
        #[arg(long)]
        issued: Option<String>,
        /// Due date (defaults to issue date plus the payment terms)
        #[arg(long)]
        due: Option<String>,
    },
    /// List invoices
    List {
        /// Only invoices with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Record payment of an invoice
    Pay {
        /// Invoice number or ID
        invoice: String,
        /// Payment date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Cancel an invoice
    Cancel {
        /// Invoice number or ID
        invoice: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle an invoice command
pub fn handle_invoice_command(
    storage: &Storage,
    settings: &Settings,
    cmd: InvoiceCommands,
) -> LedgerResult<()> {
    let service = InvoiceService::new(storage);
    let currency = settings.currency_symbol.as_str();
    let today = Utc::now().date_naive();

    match cmd {
        InvoiceCommands::Create {
            client,
            amount,
            contract,
            issued,
            due,
        } => {
            let client = ClientService::new(storage).require(&client)?;
            let contract_id = contract
                .map(|c| ContractService::new(storage).require(&c).map(|c| c.id))
                .transpose()?;

            let invoice = service.create(
                client.id,
                contract_id,
                parse_money(&amount)?,
                parse_optional_date(issued.as_deref())?.unwrap_or(today),
                parse_optional_date(due.as_deref())?,
                settings.default_payment_terms_days,
            )?;
            println!(
                "Created invoice {} for {}: {} due {}",
                invoice.number,
                client.name,
                invoice.amount.format_with_symbol(currency),
                format_date(invoice.due_date, &settings.date_format)
            );
        }

        InvoiceCommands::List { status } => {
            let status = status
                .map(|s| {
                    InvoiceStatus::parse(&s).ok_or_else(|| {
                        LedgerError::Validation(format!("Unknown invoice status '{}'", s))
                    })
                })
                .transpose()?;

            service.refresh_overdue(today)?;

            let names: HashMap<ClientId, String> = ClientService::new(storage)
                .list(true)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            let rows: Vec<_> = service
                .list(status)?
                .into_iter()
                .map(|i| {
                    let name = names
                        .get(&i.client_id)
                        .cloned()
                        .unwrap_or_else(|| "(unknown client)".to_string());
                    (i, name)
                })
                .collect();
            println!("{}", format_invoice_list(&rows, currency, &settings.date_format));
        }

        InvoiceCommands::Pay { invoice, date } => {
            let invoice = service.require(&invoice)?;
            let paid_date = parse_optional_date(date.as_deref())?.unwrap_or(today);
            let paid = service.pay(invoice.id, paid_date)?;
            println!(
                "Marked {} paid on {} ({})",
                paid.number,
                format_date(paid_date, &settings.date_format),
                paid.amount.format_with_symbol(currency)
            );
        }

        InvoiceCommands::Cancel { invoice, yes } => {
            let invoice = service.require(&invoice)?;
            if !confirm(&format!("Cancel invoice {}?", invoice.number), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            let cancelled = service.cancel(invoice.id)?;
            println!("Cancelled invoice {}", cancelled.number);
        }
    }

    Ok(())
}
