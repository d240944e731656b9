//! User settings for freelance-ledger
//!
//! Besides display preferences, settings carry the business-policy constants
//! the revenue report depends on, so they can be inspected and overridden in
//! `config.json` rather than being buried in code.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::reports::revenue::RevenuePolicy;

/// Months a fixed-price contract is spread over when its own duration is
/// unknown (no end date) or rounds to zero months.
pub const DEFAULT_FIXED_PRICE_FALLBACK_MONTHS: u32 = 3;

/// Length of the trailing window hourly sessions are summed over.
pub const DEFAULT_HOURLY_WINDOW_DAYS: u32 = 30;

/// User settings for freelance-ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime pattern used wherever dates are shown or exported
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_hourly_window_days")]
    pub hourly_window_days: u32,

    #[serde(default = "default_fixed_price_fallback_months")]
    pub fixed_price_fallback_months: u32,

    /// Days between issue and due date for new invoices
    #[serde(default = "default_payment_terms_days")]
    pub default_payment_terms_days: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_hourly_window_days() -> u32 {
    DEFAULT_HOURLY_WINDOW_DAYS
}

fn default_fixed_price_fallback_months() -> u32 {
    DEFAULT_FIXED_PRICE_FALLBACK_MONTHS
}

fn default_payment_terms_days() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            hourly_window_days: default_hourly_window_days(),
            fixed_price_fallback_months: default_fixed_price_fallback_months(),
            default_payment_terms_days: default_payment_terms_days(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if none are saved
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.fixed_price_fallback_months == 0 {
            return Err(LedgerError::Config(
                "fixed_price_fallback_months must be at least 1".into(),
            ));
        }
        if self.hourly_window_days == 0 {
            return Err(LedgerError::Config(
                "hourly_window_days must be at least 1".into(),
            ));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LedgerError::Config(format!(
                "date_format '{}' is not a valid strftime pattern",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Revenue normalization policy derived from these settings
    pub fn revenue_policy(&self) -> RevenuePolicy {
        RevenuePolicy {
            hourly_window_days: i64::from(self.hourly_window_days),
            fixed_price_fallback_months: self.fixed_price_fallback_months,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.hourly_window_days, 30);
        assert_eq!(settings.fixed_price_fallback_months, 3);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.fixed_price_fallback_months = 6;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.fixed_price_fallback_months, 6);
        assert_eq!(loaded.revenue_policy().fixed_price_fallback_months, 6);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.fixed_price_fallback_months, DEFAULT_FIXED_PRICE_FALLBACK_MONTHS);
    }

    #[test]
    fn test_bad_date_format_rejected() {
        let mut settings = Settings::default();
        settings.date_format = "%d.%m.%Y".to_string();
        assert!(settings.validate().is_ok());

        settings.date_format = "%Q-%Y".to_string();
        assert!(matches!(settings.validate(), Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_zero_fallback_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"fixed_price_fallback_months": 0}"#).unwrap();

        assert!(Settings::load_or_create(&paths).is_err());
    }
}
