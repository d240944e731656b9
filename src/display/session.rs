//! Tracking session display formatting

use tabled::Tabled;

use crate::models::TrackingSession;

use super::{format_date, render_table};

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Contract")]
    contract: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Billable")]
    billable: &'static str,
    #[tabled(rename = "Notes")]
    notes: String,
}

/// Sessions paired with their contract's name
pub fn format_session_list(sessions: &[(TrackingSession, String)], date_format: &str) -> String {
    let rows = sessions
        .iter()
        .map(|(s, contract)| SessionRow {
            id: s.id.short(),
            contract: contract.clone(),
            start: format!(
                "{} {}",
                format_date(s.start.date_naive(), date_format),
                s.start.format("%H:%M")
            ),
            hours: match s.hours {
                Some(h) => format!("{:.2}", h),
                None => "running".to_string(),
            },
            billable: if s.billable { "Yes" } else { "No" },
            notes: s.notes.clone(),
        })
        .collect();
    render_table(rows, "No sessions found.")
}
