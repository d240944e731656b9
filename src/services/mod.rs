//! Service layer for freelance-ledger
//!
//! Services sit on top of storage: they validate input, persist through the
//! repositories and record every mutation in the audit log.

pub mod client;
pub mod contract;
pub mod expense;
pub mod goal;
pub mod import;
pub mod invoice;
pub mod session;

pub use client::ClientService;
pub use contract::{ContractService, NewContract};
pub use expense::ExpenseService;
pub use goal::GoalService;
pub use import::{parse_category, parse_date, ImportResult, ImportService};
pub use invoice::InvoiceService;
pub use session::SessionService;
