//! First-run setup

use crate::config::paths::LedgerPaths;
use crate::config::Settings;
use crate::error::LedgerError;

/// Initialize a fresh ledger directory
///
/// Creates the directory layout and writes default settings. An existing
/// `config.json` is left untouched. Returns whether anything was created.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<bool, LedgerError> {
    paths.ensure_directories()?;

    if paths.is_initialized() {
        return Ok(false);
    }

    Settings::default().save(paths)?;
    tracing::info!(dir = %paths.base_dir().display(), "initialized ledger");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!paths.is_initialized());
        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.is_initialized());
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let mut settings = Settings::default();
        settings.currency_symbol = "€".to_string();
        settings.save(&paths).unwrap();

        assert!(!initialize_storage(&paths).unwrap());
        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
    }
}
