//! CLI command handler for CSV expense import

use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Import expenses from a headed CSV file and print a summary
pub fn handle_import_command(storage: &Storage, file: &Path) -> LedgerResult<()> {
    if !file.exists() {
        return Err(LedgerError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let result = ImportService::new(storage).import_file(file)?;

    println!("{}", result.summary());
    println!("  Imported:    {}", result.imported);
    println!("  Skipped:     {}", result.duplicates_skipped);
    if !result.by_category.is_empty() {
        println!("  By category:");
        for (category, count) in &result.by_category {
            println!("    {:<16} {}", category.to_string(), count);
        }
    }
    if !result.errors.is_empty() {
        println!("  Errors:      {}", result.errors.len());
        for error in &result.errors {
            println!("    Line {}: {}", error.line, error.message);
        }
    }

    Ok(())
}
