//! Configuration module for freelance-ledger
//!
//! - Data directory resolution
//! - User settings persistence, including revenue policy constants

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
