//! Client queries

use crate::error::LedgerError;
use crate::models::Client;

use super::collection::Collection;

pub type ClientRepository = Collection<Client>;

impl Collection<Client> {
    /// Find a client by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Client>, LedgerError> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .read()?
            .values()
            .find(|c| c.name.to_lowercase() == needle)
            .cloned())
    }

    /// Clients sorted by name, optionally including archived ones
    pub fn list_sorted(&self, include_archived: bool) -> Result<Vec<Client>, LedgerError> {
        let mut clients = self.filter(|c| include_archived || !c.archived)?;
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_by_name_and_sorting() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ClientRepository::new(temp_dir.path().join("clients.json"));

        let mut archived = Client::new("Zeta Labs");
        archived.archive();
        repo.upsert(Client::new("beta corp")).unwrap();
        repo.upsert(Client::new("Acme")).unwrap();
        repo.upsert(archived).unwrap();

        assert!(repo.get_by_name("ACME").unwrap().is_some());
        assert!(repo.get_by_name("nobody").unwrap().is_none());

        let names: Vec<_> = repo
            .list_sorted(false)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Acme", "beta corp"]);
        assert_eq!(repo.list_sorted(true).unwrap().len(), 3);
    }
}
