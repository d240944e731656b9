//! Path management for freelance-ledger
//!
//! ## Path Resolution Order
//!
//! 1. `FREELANCE_LEDGER_DIR` environment variable (if set)
//! 2. The platform data directory for `freelance-ledger`
//!    (e.g. `~/.local/share/freelance-ledger` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LedgerError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "FREELANCE_LEDGER_DIR";

/// Manages all paths used by freelance-ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "freelance-ledger")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    LedgerError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn clients_file(&self) -> PathBuf {
        self.data_dir().join("clients.json")
    }

    pub fn contracts_file(&self) -> PathBuf {
        self.data_dir().join("contracts.json")
    }

    pub fn sessions_file(&self) -> PathBuf {
        self.data_dir().join("sessions.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn invoices_file(&self) -> PathBuf {
        self.data_dir().join("invoices.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
