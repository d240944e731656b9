//! Client service
//!
//! Creation, lookup and archiving of clients.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Client, ClientId};
use crate::storage::Storage;

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
}

impl<'a> ClientService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a client with a unique name
    pub fn create(
        &self,
        name: &str,
        email: Option<String>,
        notes: Option<String>,
    ) -> LedgerResult<Client> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Client name cannot be empty".into()));
        }

        if self.storage.clients.get_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Client",
                identifier: name.to_string(),
            });
        }

        let mut client = Client::new(name);
        client.email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        client.notes = notes.unwrap_or_default();

        client
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_create(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &client,
        )?;

        tracing::debug!(client = %client.id, "client created");
        Ok(client)
    }

    pub fn get(&self, id: ClientId) -> LedgerResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Find a client by name or short ID
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Client>> {
        if let Some(client) = self.storage.clients.get_by_name(identifier)? {
            return Ok(Some(client));
        }
        self.storage.clients.get_by_short_id(identifier)
    }

    /// Like [`find`](Self::find), but a miss is an error
    pub fn require(&self, identifier: &str) -> LedgerResult<Client> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::client_not_found(identifier))
    }

    pub fn list(&self, include_archived: bool) -> LedgerResult<Vec<Client>> {
        self.storage.clients.list_sorted(include_archived)
    }

    /// Archive a client (soft delete)
    pub fn archive(&self, id: ClientId) -> LedgerResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| LedgerError::client_not_found(id.to_string()))?;

        if client.archived {
            return Err(LedgerError::Validation("Client is already archived".into()));
        }

        let before = client.clone();
        client.archive();

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_update(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &before,
            &client,
        )?;

        Ok(client)
    }
}
