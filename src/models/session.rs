//! Time-tracking session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ContractId, SessionId};

/// A block of time worked against a contract
///
/// A running timer has no `end` and no `hours`. Only sessions that are
/// billable *and* have recorded hours count toward revenue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSession {
    pub id: SessionId,
    pub contract_id: ContractId,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    pub billable: bool,
    #[serde(default)]
    pub notes: String,
}

impl TrackingSession {
    /// Start a running session
    pub fn start(contract_id: ContractId, start: DateTime<Utc>, billable: bool) -> Self {
        Self {
            id: SessionId::new(),
            contract_id,
            start,
            end: None,
            hours: None,
            billable,
            notes: String::new(),
        }
    }

    /// A completed session entered after the fact
    pub fn logged(contract_id: ContractId, start: DateTime<Utc>, hours: f64, billable: bool) -> Self {
        let mut session = Self::start(contract_id, start, billable);
        session.hours = Some(hours);
        session.end = Some(start + chrono::Duration::seconds((hours * 3600.0).round() as i64));
        session
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// Stop a running session, recording elapsed hours rounded to 2 decimals
    pub fn stop(&mut self, at: DateTime<Utc>) -> f64 {
        let elapsed = (at - self.start).num_seconds().max(0) as f64 / 3600.0;
        let hours = (elapsed * 100.0).round() / 100.0;
        self.end = Some(at);
        self.hours = Some(hours);
        hours
    }

    /// Hours that count toward revenue, if any
    pub fn billable_hours(&self) -> Option<f64> {
        if self.billable {
            self.hours
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stop_records_hours() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let mut session = TrackingSession::start(ContractId::new(), start, true);
        assert!(session.is_running());

        let hours = session.stop(start + chrono::Duration::minutes(90));
        assert_eq!(hours, 1.5);
        assert!(!session.is_running());
        assert_eq!(session.billable_hours(), Some(1.5));
    }

    #[test]
    fn test_non_billable_has_no_billable_hours() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let session = TrackingSession::logged(ContractId::new(), start, 3.0, false);
        assert_eq!(session.hours, Some(3.0));
        assert_eq!(session.billable_hours(), None);
    }
}
