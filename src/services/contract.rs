//! Contract service

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BillingTerms, ClientId, Contract, ContractId};
use crate::storage::Storage;

/// Input for a new contract
#[derive(Debug, Clone)]
pub struct NewContract {
    pub name: String,
    pub client_id: ClientId,
    pub billing: BillingTerms,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
}

/// Service for contract management
pub struct ContractService<'a> {
    storage: &'a Storage,
}

impl<'a> ContractService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: NewContract) -> LedgerResult<Contract> {
        let client = self
            .storage
            .clients
            .get(input.client_id)?
            .ok_or_else(|| LedgerError::client_not_found(input.client_id.to_string()))?;
        if client.archived {
            return Err(LedgerError::Validation(format!(
                "Client '{}' is archived",
                client.name
            )));
        }

        let mut contract = Contract::new(
            input.name.trim(),
            input.client_id,
            input.billing,
            input.start_date,
        );
        contract.end_date = input.end_date;
        contract.notes = input.notes;

        contract
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if contract.billing.amount().is_none() {
            tracing::warn!(
                contract = %contract.name,
                billing = %contract.billing_type(),
                "contract created without a rate or price"
            );
        }

        self.storage.contracts.upsert(contract.clone())?;
        self.storage.contracts.save()?;

        self.storage.log_create(
            EntityType::Contract,
            contract.id.to_string(),
            Some(contract.name.clone()),
            &contract,
        )?;

        Ok(contract)
    }

    pub fn get(&self, id: ContractId) -> LedgerResult<Option<Contract>> {
        self.storage.contracts.get(id)
    }

    /// Find a contract by short ID, or by name when the name is unambiguous
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Contract>> {
        if let Some(contract) = self.storage.contracts.get_by_short_id(identifier)? {
            return Ok(Some(contract));
        }

        let needle = identifier.trim().to_lowercase();
        let mut matches = self
            .storage
            .contracts
            .filter(|c| c.name.to_lowercase() == needle)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LedgerError::Validation(format!(
                "{} contracts are named '{}'; use the contract ID",
                n, identifier
            ))),
        }
    }

    pub fn require(&self, identifier: &str) -> LedgerResult<Contract> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::contract_not_found(identifier))
    }

    pub fn list(&self, active_only: bool) -> LedgerResult<Vec<Contract>> {
        if active_only {
            self.storage.contracts.get_active()
        } else {
            self.storage.contracts.list_sorted()
        }
    }

    pub fn list_for_client(&self, client_id: ClientId) -> LedgerResult<Vec<Contract>> {
        self.storage.contracts.get_by_client(client_id)
    }

    /// Mark a contract inactive; it drops out of the dashboard
    pub fn deactivate(&self, id: ContractId) -> LedgerResult<Contract> {
        let mut contract = self
            .storage
            .contracts
            .get(id)?
            .ok_or_else(|| LedgerError::contract_not_found(id.to_string()))?;

        if !contract.active {
            return Err(LedgerError::Validation("Contract is already inactive".into()));
        }

        let before = contract.clone();
        contract.deactivate();

        self.storage.contracts.upsert(contract.clone())?;
        self.storage.contracts.save()?;

        self.storage.log_update(
            EntityType::Contract,
            contract.id.to_string(),
            Some(contract.name.clone()),
            &before,
            &contract,
        )?;

        Ok(contract)
    }
}
