//! Custom error types for freelance-ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for freelance-ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A goal period kind or selector that cannot be resolved to a date range
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Date text that matches none of the accepted import formats
    #[error("Unparseable date: '{0}'")]
    UnparseableDate(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl LedgerError {
    /// Create a "not found" error for clients
    pub fn client_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Client",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for contracts
    pub fn contract_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Contract",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for tracking sessions
    pub fn session_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Session",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for invoices
    pub fn invoice_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Invoice",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<dialoguer::Error> for LedgerError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

/// Result type alias for freelance-ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::contract_not_found("Website rebuild");
        assert_eq!(err.to_string(), "Contract not found: Website rebuild");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_failures_display() {
        let err = LedgerError::UnparseableDate("31/31/2024".into());
        assert_eq!(err.to_string(), "Unparseable date: '31/31/2024'");

        let err = LedgerError::InvalidPeriod("weekly".into());
        assert_eq!(err.to_string(), "Invalid period: weekly");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
