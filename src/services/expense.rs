//! Expense service

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ClientId, Expense, ExpenseCategory, Money};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn add(
        &self,
        date: NaiveDate,
        amount: Money,
        category: ExpenseCategory,
        description: &str,
        client_id: Option<ClientId>,
    ) -> LedgerResult<Expense> {
        if let Some(client_id) = client_id {
            if !self.storage.clients.exists(client_id)? {
                return Err(LedgerError::client_not_found(client_id.to_string()));
            }
        }

        let mut expense = Expense::new(date, amount, category).with_description(description.trim());
        expense.client_id = client_id;

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;
        self.storage
            .log_create(EntityType::Expense, expense.id.to_string(), None, &expense)?;

        Ok(expense)
    }

    /// Expenses newest first, optionally narrowed to a category and date range
    pub fn list(
        &self,
        category: Option<ExpenseCategory>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Expense>> {
        let mut expenses = self.storage.expenses.get_by_date_range(from, to)?;
        if let Some(category) = category {
            expenses.retain(|e| e.category == category);
        }
        Ok(expenses)
    }

    /// Totals per category over a date range
    pub fn totals_by_category(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<BTreeMap<ExpenseCategory, Money>> {
        let mut totals = BTreeMap::new();
        for expense in self.storage.expenses.get_by_date_range(from, to)? {
            *totals.entry(expense.category).or_insert_with(Money::zero) += expense.amount;
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn test_add_list_and_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        service
            .add(day(1), Money::from_units(20), ExpenseCategory::Software, "Editor", None)
            .unwrap();
        service
            .add(day(5), Money::from_units(30), ExpenseCategory::Software, "Hosting", None)
            .unwrap();
        service
            .add(day(9), Money::from_units(15), ExpenseCategory::Meals, "Lunch", None)
            .unwrap();

        assert_eq!(service.list(None, None, None).unwrap().len(), 3);
        assert_eq!(
            service
                .list(Some(ExpenseCategory::Software), None, None)
                .unwrap()
                .len(),
            2
        );

        let totals = service.totals_by_category(None, Some(day(6))).unwrap();
        assert_eq!(totals[&ExpenseCategory::Software], Money::from_units(50));
        assert!(!totals.contains_key(&ExpenseCategory::Meals));
    }

    #[test]
    fn test_rejects_negative_and_unknown_client() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        assert!(service
            .add(day(1), Money::from_cents(-1), ExpenseCategory::Other, "", None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .add(day(1), Money::from_units(1), ExpenseCategory::Other, "", Some(ClientId::new()))
            .unwrap_err()
            .is_not_found());
    }
}
