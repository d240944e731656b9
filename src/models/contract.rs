//! Contract model
//!
//! A contract binds a client to one of three billing models. The model is a
//! sum type so that each variant only carries the amount that means something
//! for it, and every `match` over it must handle all three.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, ContractId};
use super::money::Money;

/// Billing model discriminant, used for grouping and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    Hourly,
    Retainer,
    FixedPrice,
}

impl BillingType {
    /// Parse a billing type from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "hourly" | "hour" => Some(Self::Hourly),
            "retainer" | "monthly" => Some(Self::Retainer),
            "fixed" | "fixed_price" | "fixedprice" | "project" => Some(Self::FixedPrice),
            _ => None,
        }
    }
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => write!(f, "Hourly"),
            Self::Retainer => write!(f, "Retainer"),
            Self::FixedPrice => write!(f, "Fixed Price"),
        }
    }
}

/// Pricing terms of a contract
///
/// Amounts are optional: a contract entered without its rate or price is
/// still a valid record and simply contributes nothing to revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BillingTerms {
    /// Billed per tracked hour
    Hourly { rate: Option<Money> },
    /// A recurring monthly fee
    Retainer { monthly_fee: Option<Money> },
    /// A one-time fee for the whole engagement
    FixedPrice { total: Option<Money> },
}

impl BillingTerms {
    pub fn hourly(rate: Money) -> Self {
        Self::Hourly { rate: Some(rate) }
    }

    pub fn retainer(monthly_fee: Money) -> Self {
        Self::Retainer {
            monthly_fee: Some(monthly_fee),
        }
    }

    pub fn fixed_price(total: Money) -> Self {
        Self::FixedPrice { total: Some(total) }
    }

    pub fn billing_type(&self) -> BillingType {
        match self {
            Self::Hourly { .. } => BillingType::Hourly,
            Self::Retainer { .. } => BillingType::Retainer,
            Self::FixedPrice { .. } => BillingType::FixedPrice,
        }
    }

    /// The one amount that is meaningful for this billing model
    pub fn amount(&self) -> Option<Money> {
        match self {
            Self::Hourly { rate } => *rate,
            Self::Retainer { monthly_fee } => *monthly_fee,
            Self::FixedPrice { total } => *total,
        }
    }

    /// Build terms from a type plus the optional rate/price pair a form or
    /// import row supplies. Only the field meaningful for the type is kept.
    pub fn from_parts(
        billing_type: BillingType,
        hourly_rate: Option<Money>,
        fixed_price: Option<Money>,
    ) -> Self {
        match billing_type {
            BillingType::Hourly => Self::Hourly { rate: hourly_rate },
            BillingType::Retainer => Self::Retainer {
                monthly_fee: fixed_price,
            },
            BillingType::FixedPrice => Self::FixedPrice { total: fixed_price },
        }
    }
}

impl BillingTerms {
    /// Terms with amounts in the given currency, e.g. "€120.00/hr"
    pub fn describe(&self, currency: &str) -> String {
        match self {
            Self::Hourly { rate: Some(rate) } => format!("{}/hr", rate.format_with_symbol(currency)),
            Self::Retainer {
                monthly_fee: Some(fee),
            } => format!("{}/month", fee.format_with_symbol(currency)),
            Self::FixedPrice { total: Some(total) } => {
                format!("{} total", total.format_with_symbol(currency))
            }
            other => format!("{} (no amount)", other.billing_type()),
        }
    }
}

impl fmt::Display for BillingTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.describe("$"))
    }
}

/// An engagement with a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub name: String,
    pub client_id: ClientId,
    pub billing: BillingTerms,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    pub fn new(
        name: impl Into<String>,
        client_id: ClientId,
        billing: BillingTerms,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContractId::new(),
            name: name.into(),
            client_id,
            billing,
            start_date,
            end_date: None,
            active: true,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn billing_type(&self) -> BillingType {
        self.billing.billing_type()
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Validate the contract
    pub fn validate(&self) -> Result<(), ContractValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContractValidationError::EmptyName);
        }
        if let Some(amount) = self.billing.amount() {
            if amount.is_negative() {
                return Err(ContractValidationError::NegativeAmount(amount));
            }
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ContractValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Validation errors for contracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractValidationError {
    EmptyName,
    NegativeAmount(Money),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for ContractValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Contract name cannot be empty"),
            Self::NegativeAmount(m) => write!(f, "Contract amount cannot be negative: {}", m),
            Self::EndBeforeStart { start, end } => {
                write!(f, "Contract ends ({}) before it starts ({})", end, start)
            }
        }
    }
}

impl std::error::Error for ContractValidationError {}
