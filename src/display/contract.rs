//! Contract display formatting

use tabled::Tabled;

use crate::models::Contract;

use super::{format_date, render_table};

#[derive(Tabled)]
struct ContractRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Billing")]
    billing: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

/// Contracts paired with their client's name
pub fn format_contract_list(
    contracts: &[(Contract, String)],
    currency: &str,
    date_format: &str,
) -> String {
    let rows = contracts
        .iter()
        .map(|(c, client)| ContractRow {
            id: c.id.short(),
            name: c.name.clone(),
            client: client.clone(),
            billing: c.billing.describe(currency),
            start: format_date(c.start_date, date_format),
            end: c
                .end_date
                .map(|d| format_date(d, date_format))
                .unwrap_or_default(),
            active: if c.active { "Yes" } else { "No" },
        })
        .collect();
    render_table(rows, "No contracts found.")
}

pub fn format_contract_details(
    contract: &Contract,
    client_name: &str,
    currency: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Contract: {}\n", contract.name));
    output.push_str(&format!("  ID:       {}\n", contract.id));
    output.push_str(&format!("  Client:   {}\n", client_name));
    output.push_str(&format!(
        "  Billing:  {} ({})\n",
        contract.billing_type(),
        contract.billing.describe(currency)
    ));
    output.push_str(&format!(
        "  Start:    {}\n",
        format_date(contract.start_date, date_format)
    ));
    if let Some(end) = contract.end_date {
        output.push_str(&format!("  End:      {}\n", format_date(end, date_format)));
    }
    output.push_str(&format!(
        "  Active:   {}\n",
        if contract.active { "Yes" } else { "No" }
    ));
    if !contract.notes.is_empty() {
        output.push_str(&format!("  Notes:    {}\n", contract.notes));
    }

    output
}
