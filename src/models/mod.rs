//! Core data models for freelance-ledger
//!
//! Clients, contracts, time-tracking sessions, expenses, invoices and income
//! goals, plus the money and period value types the reports are built from.

pub mod client;
pub mod contract;
pub mod expense;
pub mod goal;
pub mod ids;
pub mod invoice;
pub mod money;
pub mod period;
pub mod session;

pub use client::Client;
pub use contract::{BillingTerms, BillingType, Contract};
pub use expense::{Expense, ExpenseCategory};
pub use goal::IncomeGoal;
pub use ids::{ClientId, ContractId, ExpenseId, GoalId, InvoiceId, SessionId};
pub use invoice::{Invoice, InvoiceStatus};
pub use money::Money;
pub use period::{DateRange, PeriodKind};
pub use session::TrackingSession;
