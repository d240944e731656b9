//! Display formatting for terminal output
//!
//! Entity lists render as `tabled` tables; single records render as
//! labelled detail blocks.

pub mod client;
pub mod contract;
pub mod expense;
pub mod goal;
pub mod invoice;
pub mod session;

pub use client::{format_client_details, format_client_list};
pub use contract::{format_contract_details, format_contract_list};
pub use expense::{format_category_totals, format_expense_list};
pub use goal::format_goal_list;
pub use invoice::format_invoice_list;
pub use session::format_session_list;

use std::fmt::Write;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render a date with the user's strftime pattern.
///
/// Falls back to ISO 8601 if the pattern cannot be rendered.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}

/// Render rows as a table, or `empty` when there are none
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(format_date(date, "%Y-%m-%d"), "2024-06-05");
        assert_eq!(format_date(date, "%d.%m.%Y"), "05.06.2024");
        assert_eq!(format_date(date, "%Q"), "2024-06-05");
    }
}
