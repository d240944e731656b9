//! Contract queries

use crate::error::LedgerError;
use crate::models::{ClientId, Contract};

use super::collection::Collection;

pub type ContractRepository = Collection<Contract>;

impl Collection<Contract> {
    pub fn get_by_client(&self, client_id: ClientId) -> Result<Vec<Contract>, LedgerError> {
        let mut contracts = self.filter(|c| c.client_id == client_id)?;
        contracts.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.name.cmp(&b.name)));
        Ok(contracts)
    }

    /// Active contracts, ordered by start date then name
    pub fn get_active(&self) -> Result<Vec<Contract>, LedgerError> {
        let mut contracts = self.filter(|c| c.active)?;
        contracts.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.name.cmp(&b.name)));
        Ok(contracts)
    }

    /// All contracts, ordered by start date then name
    pub fn list_sorted(&self) -> Result<Vec<Contract>, LedgerError> {
        let mut contracts = self.get_all()?;
        contracts.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.name.cmp(&b.name)));
        Ok(contracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingTerms, Client, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_active_and_by_client() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ContractRepository::new(temp_dir.path().join("contracts.json"));
        let client = Client::new("Acme");
        let other = Client::new("Other");
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let mut ended = Contract::new(
            "Old work",
            client.id,
            BillingTerms::hourly(Money::from_units(90)),
            start,
        );
        ended.deactivate();
        repo.upsert(ended).unwrap();
        repo.upsert(Contract::new(
            "Support",
            client.id,
            BillingTerms::retainer(Money::from_units(2000)),
            start,
        ))
        .unwrap();
        repo.upsert(Contract::new(
            "Site",
            other.id,
            BillingTerms::fixed_price(Money::from_units(3000)),
            start,
        ))
        .unwrap();

        assert_eq!(repo.get_active().unwrap().len(), 2);
        assert_eq!(repo.get_by_client(client.id).unwrap().len(), 2);
        assert_eq!(repo.get_by_client(other.id).unwrap()[0].name, "Site");
    }
}
