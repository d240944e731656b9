//! freelance-ledger - terminal bookkeeping for freelancers
//!
//! Tracks clients, contracts, billable time, expenses, invoices and income
//! goals, and turns them into a monthly revenue dashboard and goal progress
//! reports.
//!
//! # Architecture
//!
//! - `config`: data directory resolution and user settings
//! - `error`: custom error types
//! - `models`: core data models, money and goal periods
//! - `storage`: JSON file storage layer
//! - `audit`: append-only audit log
//! - `services`: business logic and CSV expense import
//! - `reports`: revenue normalization, dashboard and goal progress
//! - `display`: table rendering for the terminal
//! - `cli`: clap subcommands and their handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use chrono::Utc;
//! use freelance_ledger::config::{LedgerPaths, Settings};
//! use freelance_ledger::reports::DashboardReport;
//! use freelance_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let report = DashboardReport::generate(&storage, &settings, Utc::now())?;
//! println!("{}", report.format_terminal(&settings.currency_symbol, &settings.date_format));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
