//! Expense queries

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::models::Expense;

use super::collection::Collection;

pub type ExpenseRepository = Collection<Expense>;

impl Collection<Expense> {
    /// Expenses dated within `[from, to]` (either bound optional), newest first
    pub fn get_by_date_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Expense>, LedgerError> {
        let mut expenses = self.filter(|e| {
            from.map_or(true, |from| e.date >= from) && to.map_or(true, |to| e.date <= to)
        })?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }
}
