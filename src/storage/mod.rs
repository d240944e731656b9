//! Storage layer for freelance-ledger
//!
//! One JSON file per record type under `data/`, written atomically, plus the
//! append-only audit log.

pub mod clients;
pub mod collection;
pub mod contracts;
pub mod expenses;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod invoices;
pub mod sessions;

pub use clients::ClientRepository;
pub use collection::{Collection, Record};
pub use contracts::ContractRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use init::initialize_storage;
pub use invoices::InvoiceRepository;
pub use sessions::SessionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub clients: ClientRepository,
    pub contracts: ContractRepository,
    pub sessions: SessionRepository,
    pub expenses: ExpenseRepository,
    pub invoices: InvoiceRepository,
    pub goals: GoalRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create storage rooted at `paths`, creating directories as needed
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            clients: ClientRepository::new(paths.clients_file()),
            contracts: ContractRepository::new(paths.contracts_file()),
            sessions: SessionRepository::new(paths.sessions_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            invoices: InvoiceRepository::new(paths.invoices_file()),
            goals: GoalRepository::new(paths.goals_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.clients.load()?;
        self.contracts.load()?;
        self.sessions.load()?;
        self.expenses.load()?;
        self.invoices.load()?;
        self.goals.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.clients.save()?;
        self.contracts.save()?;
        self.sessions.save()?;
        self.expenses.save()?;
        self.invoices.save()?;
        self.goals.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), LedgerError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::Client;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_load_and_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        let client = Client::new("Acme");
        storage.clients.upsert(client.clone()).unwrap();
        storage.save_all().unwrap();
        storage
            .log_create(EntityType::Client, client.id.to_string(), None, &client)
            .unwrap();

        let reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.clients.count().unwrap(), 1);

        let entries = reopened.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
    }
}
