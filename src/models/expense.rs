//! Expense model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, ExpenseId};
use super::money::Money;

/// Closed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Software,
    Hardware,
    Travel,
    Meals,
    OfficeSupplies,
    Utilities,
    Marketing,
    Other,
}

impl ExpenseCategory {
    /// Every category, in matching priority order
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Software,
            Self::Hardware,
            Self::Travel,
            Self::Meals,
            Self::OfficeSupplies,
            Self::Utilities,
            Self::Marketing,
            Self::Other,
        ]
    }

    /// Canonical snake_case name, as stored and exported
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::Hardware => "hardware",
            Self::Travel => "travel",
            Self::Meals => "meals",
            Self::OfficeSupplies => "office_supplies",
            Self::Utilities => "utilities",
            Self::Marketing => "marketing",
            Self::Other => "other",
        }
    }

    /// Lowercase keywords that identify this category inside free text.
    /// The canonical name (with spaces for underscores) is always the first.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Software => &["software", "subscription", "saas", "license", "app store"],
            Self::Hardware => &[
                "hardware",
                "laptop",
                "computer",
                "monitor",
                "equipment",
                "headphone",
                "smartphone",
                "keyboard",
            ],
            Self::Travel => &["travel", "flight", "airfare", "hotel", "taxi", "mileage"],
            Self::Meals => &["meals", "meal", "restaurant", "lunch", "dinner", "coffee"],
            Self::OfficeSupplies => &["office supplies", "office", "supplies", "stationery", "postage"],
            Self::Utilities => &["utilities", "utility", "internet", "phone", "electricity"],
            Self::Marketing => &["marketing", "advertising", "advert", "promotion"],
            Self::Other => &["other"],
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A business expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: NaiveDate,
    pub amount: Money,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: String,
    /// Client the expense is rebillable to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(date: NaiveDate, amount: Money, category: ExpenseCategory) -> Self {
        Self {
            id: ExpenseId::new(),
            date,
            amount,
            category,
            description: String::new(),
            client_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NegativeAmount(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(m) => write!(f, "Expense amount cannot be negative: {}", m),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ExpenseCategory::OfficeSupplies).unwrap();
        assert_eq!(json, "\"office_supplies\"");
        assert_eq!(ExpenseCategory::OfficeSupplies.to_string(), "office_supplies");
    }

    #[test]
    fn test_every_category_lists_its_name_first() {
        for category in ExpenseCategory::all() {
            let first = category.keywords()[0];
            assert_eq!(first.replace(' ', "_"), category.as_str());
        }
    }

    #[test]
    fn test_negative_expense_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let expense = Expense::new(date, Money::from_cents(-1), ExpenseCategory::Other);
        assert!(expense.validate().is_err());
    }
}
