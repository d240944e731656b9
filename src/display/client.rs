//! Client display formatting

use tabled::Tabled;

use crate::models::{Client, Contract};

use super::{format_date, render_table};

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

pub fn format_client_list(clients: &[Client]) -> String {
    let rows = clients
        .iter()
        .map(|c| ClientRow {
            id: c.id.short(),
            name: c.name.clone(),
            email: c.email.clone().unwrap_or_default(),
            status: if c.archived { "Archived" } else { "" },
        })
        .collect();
    render_table(rows, "No clients found.")
}

/// A client plus the contracts held with them
pub fn format_client_details(
    client: &Client,
    contracts: &[Contract],
    currency: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Client: {}\n", client.name));
    output.push_str(&format!("  ID:        {}\n", client.id));
    if let Some(email) = &client.email {
        output.push_str(&format!("  Email:     {}\n", email));
    }
    output.push_str(&format!(
        "  Archived:  {}\n",
        if client.archived { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Created:   {}\n",
        format_date(client.created_at.date_naive(), date_format)
    ));
    if !client.notes.is_empty() {
        output.push_str(&format!("  Notes:     {}\n", client.notes));
    }

    output.push_str(&format!("\nContracts ({}):\n", contracts.len()));
    for contract in contracts {
        output.push_str(&format!(
            "  {}  {:<24} {}{}\n",
            contract.id,
            contract.name,
            contract.billing.describe(currency),
            if contract.active { "" } else { " (inactive)" }
        ));
    }

    output
}
