//! Time-tracking service
//!
//! One timer may run at a time. Completed sessions can also be logged after
//! the fact with an explicit number of hours.

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ContractId, SessionId, TrackingSession};
use crate::storage::Storage;

/// Service for tracking sessions
pub struct SessionService<'a> {
    storage: &'a Storage,
}

impl<'a> SessionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn require_active_contract(&self, contract_id: ContractId) -> LedgerResult<()> {
        let contract = self
            .storage
            .contracts
            .get(contract_id)?
            .ok_or_else(|| LedgerError::contract_not_found(contract_id.to_string()))?;
        if !contract.active {
            return Err(LedgerError::Validation(format!(
                "Contract '{}' is inactive",
                contract.name
            )));
        }
        Ok(())
    }

    /// Start a timer on an active contract
    pub fn start(
        &self,
        contract_id: ContractId,
        billable: bool,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> LedgerResult<TrackingSession> {
        self.require_active_contract(contract_id)?;

        if let Some(running) = self.storage.sessions.get_running()? {
            return Err(LedgerError::Validation(format!(
                "Session {} is already running since {}; stop it first",
                running.id,
                running.start.format("%Y-%m-%d %H:%M")
            )));
        }

        let mut session = TrackingSession::start(contract_id, now, billable);
        session.notes = notes.unwrap_or_default();

        self.storage.sessions.upsert(session.clone())?;
        self.storage.sessions.save()?;
        self.storage
            .log_create(EntityType::Session, session.id.to_string(), None, &session)?;

        tracing::debug!(session = %session.id, contract = %contract_id, "timer started");
        Ok(session)
    }

    /// Stop the running timer
    pub fn stop(&self, now: DateTime<Utc>) -> LedgerResult<TrackingSession> {
        let mut session = self
            .storage
            .sessions
            .get_running()?
            .ok_or_else(|| LedgerError::Validation("No session is running".into()))?;

        let before = session.clone();
        let hours = session.stop(now);

        self.storage.sessions.upsert(session.clone())?;
        self.storage.sessions.save()?;
        self.storage.log_update(
            EntityType::Session,
            session.id.to_string(),
            None,
            &before,
            &session,
        )?;

        tracing::debug!(session = %session.id, hours, "timer stopped");
        Ok(session)
    }

    /// Record a completed session
    pub fn log(
        &self,
        contract_id: ContractId,
        start: DateTime<Utc>,
        hours: f64,
        billable: bool,
        notes: Option<String>,
    ) -> LedgerResult<TrackingSession> {
        if !hours.is_finite() || hours <= 0.0 || hours > 24.0 {
            return Err(LedgerError::Validation(format!(
                "Hours must be between 0 and 24, got {}",
                hours
            )));
        }
        self.require_active_contract(contract_id)?;

        let mut session = TrackingSession::logged(contract_id, start, hours, billable);
        session.notes = notes.unwrap_or_default();

        self.storage.sessions.upsert(session.clone())?;
        self.storage.sessions.save()?;
        self.storage
            .log_create(EntityType::Session, session.id.to_string(), None, &session)?;

        Ok(session)
    }

    pub fn get(&self, id: SessionId) -> LedgerResult<Option<TrackingSession>> {
        self.storage.sessions.get(id)
    }

    pub fn running(&self) -> LedgerResult<Option<TrackingSession>> {
        self.storage.sessions.get_running()
    }

    /// Sessions for one contract (oldest first), or all sessions (newest first)
    pub fn list(&self, contract_id: Option<ContractId>) -> LedgerResult<Vec<TrackingSession>> {
        match contract_id {
            Some(id) => self.storage.sessions.get_by_contract(id),
            None => self.storage.sessions.list_recent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{BillingTerms, Client, Contract, Money};
    use chrono::{Duration, NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Contract) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let client = Client::new("Acme");
        let contract = Contract::new(
            "Consulting",
            client.id,
            BillingTerms::hourly(Money::from_units(100)),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        storage.clients.upsert(client).unwrap();
        storage.contracts.upsert(contract.clone()).unwrap();
        (temp_dir, storage, contract)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_start_stop() {
        let (_temp_dir, storage, contract) = setup();
        let service = SessionService::new(&storage);

        service.start(contract.id, true, None, t0()).unwrap();
        assert!(service.running().unwrap().is_some());

        let stopped = service.stop(t0() + Duration::minutes(95)).unwrap();
        assert_eq!(stopped.hours, Some(1.58));
        assert!(service.running().unwrap().is_none());
        assert!(service.stop(t0()).unwrap_err().is_validation());
    }

    #[test]
    fn test_only_one_running_session() {
        let (_temp_dir, storage, contract) = setup();
        let service = SessionService::new(&storage);

        service.start(contract.id, true, None, t0()).unwrap();
        assert!(service
            .start(contract.id, true, None, t0())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_log_validates_hours_and_contract() {
        let (_temp_dir, storage, mut contract) = setup();
        let service = SessionService::new(&storage);

        let logged = service.log(contract.id, t0(), 2.5, true, None).unwrap();
        assert_eq!(logged.billable_hours(), Some(2.5));
        assert!(service.log(contract.id, t0(), 0.0, true, None).is_err());
        assert!(service.log(ContractId::new(), t0(), 1.0, true, None).unwrap_err().is_not_found());

        contract.deactivate();
        storage.contracts.upsert(contract.clone()).unwrap();
        assert!(service.log(contract.id, t0(), 1.0, true, None).unwrap_err().is_validation());
        assert_eq!(service.list(Some(contract.id)).unwrap().len(), 1);
    }
}
