//! Invoice queries

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::models::{Invoice, InvoiceStatus};

use super::collection::Collection;

pub type InvoiceRepository = Collection<Invoice>;

impl Collection<Invoice> {
    /// Look up an invoice by its number (e.g. "INV-0003"), case-insensitive
    pub fn get_by_number(&self, number: &str) -> Result<Option<Invoice>, LedgerError> {
        let needle = number.trim();
        Ok(self
            .read()?
            .values()
            .find(|i| i.number.eq_ignore_ascii_case(needle))
            .cloned())
    }

    /// All invoices, ordered by number
    pub fn list_sorted(&self) -> Result<Vec<Invoice>, LedgerError> {
        let mut invoices = self.get_all()?;
        invoices.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(invoices)
    }

    pub fn grouped_by_status(&self) -> Result<HashMap<InvoiceStatus, Vec<Invoice>>, LedgerError> {
        let mut grouped: HashMap<InvoiceStatus, Vec<Invoice>> = HashMap::new();
        for invoice in self.list_sorted()? {
            grouped.entry(invoice.status).or_default().push(invoice);
        }
        Ok(grouped)
    }

    /// Next sequential invoice number
    pub fn next_number(&self) -> Result<String, LedgerError> {
        let highest = self
            .read()?
            .values()
            .filter_map(|i| i.number.strip_prefix("INV-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("INV-{:04}", highest + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientId, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn invoice(number: &str) -> Invoice {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Invoice::new(number, ClientId::new(), Money::from_units(100), d, d)
    }

    #[test]
    fn test_next_number() {
        let temp_dir = TempDir::new().unwrap();
        let repo = InvoiceRepository::new(temp_dir.path().join("invoices.json"));
        assert_eq!(repo.next_number().unwrap(), "INV-0001");

        repo.upsert(invoice("INV-0001")).unwrap();
        repo.upsert(invoice("INV-0009")).unwrap();
        repo.upsert(invoice("custom-7")).unwrap();
        assert_eq!(repo.next_number().unwrap(), "INV-0010");
        assert!(repo.get_by_number("inv-0009").unwrap().is_some());
    }

    #[test]
    fn test_grouped_by_status() {
        let temp_dir = TempDir::new().unwrap();
        let repo = InvoiceRepository::new(temp_dir.path().join("invoices.json"));
        let mut paid = invoice("INV-0002");
        paid.mark_paid(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        repo.upsert(invoice("INV-0001")).unwrap();
        repo.upsert(paid).unwrap();

        let grouped = repo.grouped_by_status().unwrap();
        assert_eq!(grouped[&InvoiceStatus::Pending].len(), 1);
        assert_eq!(grouped[&InvoiceStatus::Paid].len(), 1);
        assert!(!grouped.contains_key(&InvoiceStatus::Overdue));
    }
}
