//! Income goal queries

use crate::error::LedgerError;
use crate::models::IncomeGoal;

use super::collection::Collection;

pub type GoalRepository = Collection<IncomeGoal>;

impl Collection<IncomeGoal> {
    /// Goals in calendar order
    pub fn list_sorted(&self) -> Result<Vec<IncomeGoal>, LedgerError> {
        let mut goals = self.get_all()?;
        goals.sort_by(|a, b| {
            a.sort_key()
                .cmp(&b.sort_key())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_calendar_order() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo.upsert(IncomeGoal::monthly(Money::from_units(1), 2024, 8)).unwrap();
        repo.upsert(IncomeGoal::yearly(Money::from_units(1), 2024)).unwrap();
        repo.upsert(IncomeGoal::quarterly(Money::from_units(1), 2024, 2)).unwrap();
        repo.upsert(IncomeGoal::monthly(Money::from_units(1), 2023, 12)).unwrap();

        let labels: Vec<_> = repo.list_sorted().unwrap().iter().map(|g| g.label()).collect();
        assert_eq!(labels, vec!["Dec 2023", "2024", "Q2 2024", "Aug 2024"]);
    }
}
