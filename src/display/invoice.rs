//! Invoice display formatting

use tabled::Tabled;

use crate::models::Invoice;

use super::{format_date, render_table};

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Paid")]
    paid: String,
}

/// Invoices paired with their client's name
pub fn format_invoice_list(
    invoices: &[(Invoice, String)],
    currency: &str,
    date_format: &str,
) -> String {
    let rows = invoices
        .iter()
        .map(|(i, client)| InvoiceRow {
            number: i.number.clone(),
            client: client.clone(),
            amount: i.amount.format_with_symbol(currency),
            status: i.status.to_string(),
            issued: format_date(i.issue_date, date_format),
            due: format_date(i.due_date, date_format),
            paid: i
                .paid_date
                .map(|d| format_date(d, date_format))
                .unwrap_or_default(),
        })
        .collect();
    render_table(rows, "No invoices found.")
}
