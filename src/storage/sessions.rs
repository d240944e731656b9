//! Tracking session queries

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::models::{ContractId, TrackingSession};

use super::collection::Collection;

pub type SessionRepository = Collection<TrackingSession>;

impl Collection<TrackingSession> {
    /// Sessions for one contract, oldest first
    pub fn get_by_contract(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<TrackingSession>, LedgerError> {
        let mut sessions = self.filter(|s| s.contract_id == contract_id)?;
        sessions.sort_by_key(|s| s.start);
        Ok(sessions)
    }

    /// The session whose timer is still running, if any
    pub fn get_running(&self) -> Result<Option<TrackingSession>, LedgerError> {
        Ok(self.read()?.values().find(|s| s.is_running()).cloned())
    }

    /// All sessions, newest first
    pub fn list_recent(&self) -> Result<Vec<TrackingSession>, LedgerError> {
        let mut sessions = self.get_all()?;
        sessions.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(sessions)
    }

    /// All sessions grouped by contract, each group oldest first
    pub fn grouped_by_contract(
        &self,
    ) -> Result<HashMap<ContractId, Vec<TrackingSession>>, LedgerError> {
        let mut grouped: HashMap<ContractId, Vec<TrackingSession>> = HashMap::new();
        for session in self.read()?.values() {
            grouped
                .entry(session.contract_id)
                .or_default()
                .push(session.clone());
        }
        for sessions in grouped.values_mut() {
            sessions.sort_by_key(|s| s.start);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_running_and_grouping() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SessionRepository::new(temp_dir.path().join("sessions.json"));
        let a = ContractId::new();
        let b = ContractId::new();
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

        repo.upsert(TrackingSession::logged(a, t, 2.0, true)).unwrap();
        repo.upsert(TrackingSession::logged(a, t + chrono::Duration::days(1), 1.0, true))
            .unwrap();
        assert!(repo.get_running().unwrap().is_none());

        repo.upsert(TrackingSession::start(b, t, true)).unwrap();
        assert_eq!(repo.get_running().unwrap().unwrap().contract_id, b);

        let grouped = repo.grouped_by_contract().unwrap();
        assert_eq!(grouped[&a].len(), 2);
        assert_eq!(grouped[&a][0].hours, Some(2.0));
        assert_eq!(grouped[&b].len(), 1);
    }
}
