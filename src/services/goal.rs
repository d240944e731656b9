//! Income goal service

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{GoalId, IncomeGoal, Money, PeriodKind};
use crate::storage::Storage;

/// Service for income goals
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a goal. `month` is required for monthly goals and `quarter`
    /// for quarterly ones; the other selector is ignored.
    pub fn add(
        &self,
        kind: PeriodKind,
        amount: Money,
        year: i32,
        month: Option<u32>,
        quarter: Option<u32>,
        description: &str,
    ) -> LedgerResult<IncomeGoal> {
        let missing = |what: &str| {
            LedgerError::Validation(format!("A {} goal needs a {}", kind, what))
        };

        let goal = match kind {
            PeriodKind::Monthly => {
                IncomeGoal::monthly(amount, year, month.ok_or_else(|| missing("month"))?)
            }
            PeriodKind::Quarterly => {
                IncomeGoal::quarterly(amount, year, quarter.ok_or_else(|| missing("quarter"))?)
            }
            PeriodKind::Yearly => IncomeGoal::yearly(amount, year),
        }
        .with_description(description.trim());

        goal.validate().map_err(|e| match e {
            LedgerError::InvalidPeriod(msg) => LedgerError::Validation(msg),
            other => other,
        })?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;
        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.label()),
            &goal,
        )?;

        Ok(goal)
    }

    pub fn get(&self, id: GoalId) -> LedgerResult<Option<IncomeGoal>> {
        self.storage.goals.get(id)
    }

    pub fn find(&self, identifier: &str) -> LedgerResult<Option<IncomeGoal>> {
        self.storage.goals.get_by_short_id(identifier)
    }

    pub fn list(&self) -> LedgerResult<Vec<IncomeGoal>> {
        self.storage.goals.list_sorted()
    }

    pub fn remove(&self, id: GoalId) -> LedgerResult<IncomeGoal> {
        let goal = self
            .storage
            .goals
            .delete(id)?
            .ok_or_else(|| LedgerError::goal_not_found(id.to_string()))?;
        self.storage.goals.save()?;
        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.label()),
            &goal,
        )?;
        Ok(goal)
    }
}
