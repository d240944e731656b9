//! Expense import
//!
//! Normalizes loosely formatted spreadsheet fields (dates, free-text
//! categories) and bulk-loads expenses from CSV. Bad rows are collected with
//! their line numbers instead of aborting the batch.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseCategory, Money};
use crate::storage::Storage;

/// Accepted date layouts, tried in order. `1/5/2024` is January 5th.
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a date in ISO, US slash or ISO slash form
pub fn parse_date(text: &str) -> LedgerResult<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| LedgerError::UnparseableDate(text.to_string()))
}

/// Map free text onto an expense category.
///
/// Matching is case-insensitive and splits the text into words on anything
/// that is not a letter or digit, so underscores and repeated whitespace
/// don't matter. A keyword matches a whole run of words, optionally with a
/// plural "s" ("flights" matches "flight", "oatmeal" does not match "meal").
/// Categories are tried in priority order; anything unmatched is `Other`.
pub fn parse_category(text: &str) -> ExpenseCategory {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return ExpenseCategory::Other;
    }

    ExpenseCategory::all()
        .iter()
        .filter(|category| **category != ExpenseCategory::Other)
        .find(|category| {
            category
                .keywords()
                .iter()
                .any(|keyword| contains_keyword(&words, keyword))
        })
        .copied()
        .unwrap_or(ExpenseCategory::Other)
}

fn contains_keyword(words: &[&str], keyword: &str) -> bool {
    let needle: Vec<&str> = keyword.split(' ').collect();
    words.windows(needle.len()).any(|window| {
        window.iter().zip(&needle).all(|(word, key)| {
            *word == *key || word.strip_suffix('s') == Some(*key)
        })
    })
}

/// Column positions located from a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    pub category_column: Option<usize>,
    pub description_column: Option<usize>,
}

impl ColumnMapping {
    /// Locate columns by (case-insensitive) header name.
    ///
    /// `date` and `amount` are required. The description may be headed
    /// `description`, `memo`, `vendor` or `payee`.
    pub fn from_headers(headers: &StringRecord) -> LedgerResult<Self> {
        let mut date = None;
        let mut amount = None;
        let mut category = None;
        let mut description = None;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            if date.is_none() && h.contains("date") {
                date = Some(idx);
            } else if amount.is_none() && (h.contains("amount") || h == "total") {
                amount = Some(idx);
            } else if category.is_none() && h.contains("categor") {
                category = Some(idx);
            } else if description.is_none()
                && ["description", "memo", "vendor", "payee"]
                    .iter()
                    .any(|name| h.contains(name))
            {
                description = Some(idx);
            }
        }

        match (date, amount) {
            (Some(date_column), Some(amount_column)) => Ok(Self {
                date_column,
                amount_column,
                category_column: category,
                description_column: description,
            }),
            _ => Err(LedgerError::Import(
                "CSV header must include 'date' and 'amount' columns".into(),
            )),
        }
    }
}

/// A row that parsed cleanly
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpense {
    /// Line number in the source file (the header is line 1)
    pub line: usize,
    pub date: NaiveDate,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub description: String,
}

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    /// Rows matching an existing expense's date, amount and description
    pub duplicates_skipped: usize,
    pub errors: Vec<RowError>,
    pub by_category: BTreeMap<ExpenseCategory, usize>,
}

impl ImportResult {
    pub fn summary(&self) -> String {
        format!(
            "Imported {} expense(s), skipped {} duplicate(s), {} error(s)",
            self.imported,
            self.duplicates_skipped,
            self.errors.len()
        )
    }
}

/// Service for importing expenses
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse every data row of a headed CSV
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
    ) -> LedgerResult<Vec<Result<ParsedExpense, RowError>>> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let mapping = ColumnMapping::from_headers(&headers)?;

        let mut rows = Vec::new();
        for (idx, record) in csv.records().enumerate() {
            let line = idx + 2;
            let row = match record {
                Ok(record) => parse_record(&record, line, &mapping),
                Err(e) => Err(RowError {
                    line,
                    message: format!("Unreadable row: {}", e),
                }),
            };
            rows.push(row);
        }

        Ok(rows)
    }

    /// Parse and persist expenses from a CSV reader
    pub fn import_expenses<R: Read>(&self, reader: R) -> LedgerResult<ImportResult> {
        let rows = self.parse_reader(reader)?;

        let mut seen: HashSet<(NaiveDate, Money, String)> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .map(|e| (e.date, e.amount, e.description.to_lowercase()))
            .collect();

        let mut result = ImportResult::default();
        for row in rows {
            let parsed = match row {
                Ok(parsed) => parsed,
                Err(error) => {
                    tracing::debug!(line = error.line, error = %error.message, "skipping import row");
                    result.errors.push(error);
                    continue;
                }
            };

            let key = (parsed.date, parsed.amount, parsed.description.to_lowercase());
            if !seen.insert(key) {
                result.duplicates_skipped += 1;
                continue;
            }

            let expense = Expense::new(parsed.date, parsed.amount, parsed.category)
                .with_description(parsed.description);
            self.storage.expenses.upsert(expense.clone())?;
            self.storage.log_create(
                EntityType::Expense,
                expense.id.to_string(),
                None,
                &expense,
            )?;

            *result.by_category.entry(expense.category).or_default() += 1;
            result.imported += 1;
        }

        if result.imported > 0 {
            self.storage.expenses.save()?;
        }

        tracing::info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors.len(),
            "expense import finished"
        );

        Ok(result)
    }

    /// Import expenses from a CSV file on disk
    pub fn import_file(&self, path: &Path) -> LedgerResult<ImportResult> {
        let file = std::fs::File::open(path).map_err(|e| {
            LedgerError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.import_expenses(file)
    }
}

fn parse_record(
    record: &StringRecord,
    line: usize,
    mapping: &ColumnMapping,
) -> Result<ParsedExpense, RowError> {
    let row_error = |message: String| RowError { line, message };

    let date_text = record
        .get(mapping.date_column)
        .ok_or_else(|| row_error("Missing date".to_string()))?;
    let date = parse_date(date_text).map_err(|e| row_error(e.to_string()))?;

    let amount_text = record
        .get(mapping.amount_column)
        .ok_or_else(|| row_error("Missing amount".to_string()))?;
    // Bank exports often record spending as negative
    let amount = Money::parse(amount_text)
        .map_err(|e| row_error(format!("Bad amount: {}", e)))?
        .abs();

    let category = mapping
        .category_column
        .and_then(|col| record.get(col))
        .map(parse_category)
        .unwrap_or(ExpenseCategory::Other);

    let description = mapping
        .description_column
        .and_then(|col| record.get(col))
        .unwrap_or_default()
        .to_string();

    Ok(ParsedExpense {
        line,
        date,
        amount,
        category,
        description,
    })
}
