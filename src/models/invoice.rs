//! Invoice model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, ContractId, InvoiceId};
use super::money::Money;

/// Lifecycle status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet sent
    Draft,
    /// Sent and awaiting payment
    #[default]
    Pending,
    Paid,
    /// Past its due date and still unpaid
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Statuses whose amounts count as unpaid exposure
    pub fn is_unpaid(&self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" | "sent" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
            Self::Cancelled => "Cancelled",
        };
        f.pad(s)
    }
}

/// A bill sent to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Human-facing number, e.g. "INV-0007"
    pub number: String,
    pub client_id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
    pub amount: Money,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        number: impl Into<String>,
        client_id: ClientId,
        amount: Money,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new(),
            number: number.into(),
            client_id,
            contract_id: None,
            amount,
            status: InvoiceStatus::Pending,
            issue_date,
            due_date,
            paid_date: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_paid(&mut self, paid_date: NaiveDate) {
        self.status = InvoiceStatus::Paid;
        self.paid_date = Some(paid_date);
        self.updated_at = Utc::now();
    }

    pub fn cancel(&mut self) {
        self.status = InvoiceStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    /// Pending and past due on `today`
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Pending && self.due_date < today
    }

    pub fn validate(&self) -> Result<(), InvoiceValidationError> {
        if !self.amount.is_positive() {
            return Err(InvoiceValidationError::NonPositiveAmount(self.amount));
        }
        if self.due_date < self.issue_date {
            return Err(InvoiceValidationError::DueBeforeIssue);
        }
        Ok(())
    }
}

/// Validation errors for invoices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceValidationError {
    NonPositiveAmount(Money),
    DueBeforeIssue,
}

impl fmt::Display for InvoiceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(m) => write!(f, "Invoice amount must be positive, got {}", m),
            Self::DueBeforeIssue => write!(f, "Invoice due date is before its issue date"),
        }
    }
}

impl std::error::Error for InvoiceValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unpaid_statuses() {
        assert!(InvoiceStatus::Pending.is_unpaid());
        assert!(InvoiceStatus::Overdue.is_unpaid());
        assert!(!InvoiceStatus::Paid.is_unpaid());
        assert!(!InvoiceStatus::Draft.is_unpaid());
        assert!(!InvoiceStatus::Cancelled.is_unpaid());
    }

    #[test]
    fn test_past_due() {
        let invoice = Invoice::new(
            "INV-0001",
            ClientId::new(),
            Money::from_units(500),
            date(2024, 5, 1),
            date(2024, 5, 31),
        );
        assert!(!invoice.is_past_due(date(2024, 5, 31)));
        assert!(invoice.is_past_due(date(2024, 6, 1)));
    }

    #[test]
    fn test_mark_paid() {
        let mut invoice = Invoice::new(
            "INV-0001",
            ClientId::new(),
            Money::from_units(500),
            date(2024, 5, 1),
            date(2024, 5, 31),
        );
        invoice.mark_paid(date(2024, 5, 20));
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.paid_date, Some(date(2024, 5, 20)));
        assert!(!invoice.is_past_due(date(2024, 7, 1)));
    }

    #[test]
    fn test_validation() {
        let invoice = Invoice::new(
            "INV-0001",
            ClientId::new(),
            Money::zero(),
            date(2024, 5, 1),
            date(2024, 5, 31),
        );
        assert!(matches!(
            invoice.validate(),
            Err(InvoiceValidationError::NonPositiveAmount(_))
        ));
    }
}
