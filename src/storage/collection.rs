//! Keyed in-memory collection backed by one JSON file
//!
//! Each entity type lives in its own file shaped `{ "<key>": [ ... ] }`.
//! Records are held in a map keyed by ID and written back on `save`.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;
use crate::models::{
    Client, ClientId, Contract, ContractId, Expense, ExpenseId, GoalId, IncomeGoal, Invoice,
    InvoiceId, SessionId, TrackingSession,
};

use super::file_io::{read_json, write_json_atomic};

/// A persisted record with a stable ID
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Ord + Hash + fmt::Display;

    /// Top-level key of the JSON file
    const FILE_KEY: &'static str;

    fn id(&self) -> Self::Id;

    /// Whether a user-supplied short ID refers to this record
    fn matches_short_id(&self, s: &str) -> bool;
}

macro_rules! impl_record {
    ($ty:ty, $id:ty, $key:literal) => {
        impl Record for $ty {
            type Id = $id;
            const FILE_KEY: &'static str = $key;

            fn id(&self) -> $id {
                self.id
            }

            fn matches_short_id(&self, s: &str) -> bool {
                self.id.matches_short(s)
            }
        }
    };
}

impl_record!(Client, ClientId, "clients");
impl_record!(Contract, ContractId, "contracts");
impl_record!(TrackingSession, SessionId, "sessions");
impl_record!(Expense, ExpenseId, "expenses");
impl_record!(Invoice, InvoiceId, "invoices");
impl_record!(IncomeGoal, GoalId, "goals");

/// Repository for one record type
pub struct Collection<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<T::Id, T>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<T::Id, T>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk, replacing anything held in memory
    pub fn load(&self) -> Result<(), LedgerError> {
        let mut file_data: HashMap<String, Vec<T>> = read_json(&self.path)?;
        let records = file_data.remove(T::FILE_KEY).unwrap_or_default();

        let mut data = self.write()?;
        data.clear();
        for record in records {
            data.insert(record.id(), record);
        }

        tracing::debug!(file = %self.path.display(), count = data.len(), "loaded records");
        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let mut records: Vec<T> = self.read()?.values().cloned().collect();
        records.sort_by_key(|record| record.id());
        let mut file_data = HashMap::new();
        file_data.insert(T::FILE_KEY, records);
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, LedgerError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Look up a record by its short display ID (e.g. "con-1a2b3c4d")
    pub fn get_by_short_id(&self, s: &str) -> Result<Option<T>, LedgerError> {
        Ok(self
            .read()?
            .values()
            .find(|record| record.matches_short_id(s))
            .cloned())
    }

    /// All records, in no particular order
    pub fn get_all(&self) -> Result<Vec<T>, LedgerError> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Records matching a predicate
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<T>, LedgerError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self
            .read()?
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }

    /// Insert or update a record
    pub fn upsert(&self, record: T) -> Result<(), LedgerError> {
        self.write()?.insert(record.id(), record);
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> Result<Option<T>, LedgerError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn exists(&self, id: T::Id) -> Result<bool, LedgerError> {
        Ok(self.read()?.contains_key(&id))
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_collection() -> (TempDir, Collection<Client>) {
        let temp_dir = TempDir::new().unwrap();
        let collection = Collection::new(temp_dir.path().join("clients.json"));
        (temp_dir, collection)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, collection) = create_test_collection();
        collection.load().unwrap();
        assert_eq!(collection.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, collection) = create_test_collection();
        let client = Client::new("Acme");
        let id = client.id;

        collection.upsert(client).unwrap();
        collection.save().unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("clients.json")).unwrap();
        assert!(raw.contains("\"clients\""));

        let reloaded: Collection<Client> = Collection::new(temp_dir.path().join("clients.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().name, "Acme");
    }

    #[test]
    fn test_short_id_lookup() {
        let (_temp_dir, collection) = create_test_collection();
        let client = Client::new("Acme");
        let short = client.id.short();
        collection.upsert(client).unwrap();

        assert!(collection.get_by_short_id(&short).unwrap().is_some());
        assert!(collection.get_by_short_id("cli-zzzzzzzz").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, collection) = create_test_collection();
        let client = Client::new("Acme");
        let id = client.id;
        collection.upsert(client).unwrap();

        assert!(collection.delete(id).unwrap().is_some());
        assert!(!collection.exists(id).unwrap());
        assert!(collection.delete(id).unwrap().is_none());
    }
}
