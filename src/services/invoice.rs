//! Invoice service
//!
//! Numbering, payment and the pending → overdue transition.

use chrono::{Duration, NaiveDate};

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ClientId, ContractId, Invoice, InvoiceId, InvoiceStatus, Money};
use crate::storage::Storage;

/// Service for invoices
pub struct InvoiceService<'a> {
    storage: &'a Storage,
}

impl<'a> InvoiceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a pending invoice with the next sequential number.
    ///
    /// Without an explicit due date the invoice is due `payment_terms_days`
    /// after issue.
    pub fn create(
        &self,
        client_id: ClientId,
        contract_id: Option<ContractId>,
        amount: Money,
        issue_date: NaiveDate,
        due_date: Option<NaiveDate>,
        payment_terms_days: u32,
    ) -> LedgerResult<Invoice> {
        if !self.storage.clients.exists(client_id)? {
            return Err(LedgerError::client_not_found(client_id.to_string()));
        }
        if let Some(contract_id) = contract_id {
            let contract = self
                .storage
                .contracts
                .get(contract_id)?
                .ok_or_else(|| LedgerError::contract_not_found(contract_id.to_string()))?;
            if contract.client_id != client_id {
                return Err(LedgerError::Validation(format!(
                    "Contract '{}' belongs to a different client",
                    contract.name
                )));
            }
        }

        let due_date =
            due_date.unwrap_or_else(|| issue_date + Duration::days(i64::from(payment_terms_days)));
        let number = self.storage.invoices.next_number()?;

        let mut invoice = Invoice::new(number, client_id, amount, issue_date, due_date);
        invoice.contract_id = contract_id;

        invoice
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.invoices.upsert(invoice.clone())?;
        self.storage.invoices.save()?;
        self.storage.log_create(
            EntityType::Invoice,
            invoice.id.to_string(),
            Some(invoice.number.clone()),
            &invoice,
        )?;

        Ok(invoice)
    }

    pub fn get(&self, id: InvoiceId) -> LedgerResult<Option<Invoice>> {
        self.storage.invoices.get(id)
    }

    /// Find an invoice by number ("INV-0003") or short ID
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Invoice>> {
        if let Some(invoice) = self.storage.invoices.get_by_number(identifier)? {
            return Ok(Some(invoice));
        }
        self.storage.invoices.get_by_short_id(identifier)
    }

    pub fn require(&self, identifier: &str) -> LedgerResult<Invoice> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::invoice_not_found(identifier))
    }

    pub fn list(&self, status: Option<InvoiceStatus>) -> LedgerResult<Vec<Invoice>> {
        let mut invoices = self.storage.invoices.list_sorted()?;
        if let Some(status) = status {
            invoices.retain(|i| i.status == status);
        }
        Ok(invoices)
    }

    fn transition<F>(&self, id: InvoiceId, change: F) -> LedgerResult<Invoice>
    where
        F: FnOnce(&mut Invoice) -> LedgerResult<()>,
    {
        let mut invoice = self
            .storage
            .invoices
            .get(id)?
            .ok_or_else(|| LedgerError::invoice_not_found(id.to_string()))?;
        let before = invoice.clone();
        change(&mut invoice)?;

        self.storage.invoices.upsert(invoice.clone())?;
        self.storage.invoices.save()?;
        self.storage.log_update(
            EntityType::Invoice,
            invoice.id.to_string(),
            Some(invoice.number.clone()),
            &before,
            &invoice,
        )?;

        Ok(invoice)
    }

    /// Record payment on `paid_date`
    pub fn pay(&self, id: InvoiceId, paid_date: NaiveDate) -> LedgerResult<Invoice> {
        self.transition(id, |invoice| match invoice.status {
            InvoiceStatus::Paid => Err(LedgerError::Validation(format!(
                "Invoice {} is already paid",
                invoice.number
            ))),
            InvoiceStatus::Cancelled => Err(LedgerError::Validation(format!(
                "Invoice {} is cancelled",
                invoice.number
            ))),
            _ => {
                invoice.mark_paid(paid_date);
                Ok(())
            }
        })
    }

    pub fn cancel(&self, id: InvoiceId) -> LedgerResult<Invoice> {
        self.transition(id, |invoice| {
            if invoice.status == InvoiceStatus::Paid {
                return Err(LedgerError::Validation(format!(
                    "Invoice {} is paid and cannot be cancelled",
                    invoice.number
                )));
            }
            invoice.cancel();
            Ok(())
        })
    }

    /// Move every pending invoice past its due date to overdue.
    ///
    /// Returns the invoices that changed.
    pub fn refresh_overdue(&self, today: NaiveDate) -> LedgerResult<Vec<Invoice>> {
        let due = self.storage.invoices.filter(|i| i.is_past_due(today))?;

        let mut changed = Vec::with_capacity(due.len());
        for before in due {
            let mut invoice = before.clone();
            invoice.status = InvoiceStatus::Overdue;
            invoice.updated_at = chrono::Utc::now();
            self.storage.invoices.upsert(invoice.clone())?;
            self.storage.log_update(
                EntityType::Invoice,
                invoice.id.to_string(),
                Some(invoice.number.clone()),
                &before,
                &invoice,
            )?;
            changed.push(invoice);
        }

        if !changed.is_empty() {
            self.storage.invoices.save()?;
            tracing::info!(count = changed.len(), "invoices marked overdue");
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Client;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Client) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let client = Client::new("Acme");
        storage.clients.upsert(client.clone()).unwrap();
        (temp_dir, storage, client)
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_numbering_and_default_terms() {
        let (_temp_dir, storage, client) = setup();
        let service = InvoiceService::new(&storage);

        let first = service
            .create(client.id, None, Money::from_units(500), day(5, 1), None, 30)
            .unwrap();
        let second = service
            .create(client.id, None, Money::from_units(750), day(5, 2), Some(day(5, 16)), 30)
            .unwrap();

        assert_eq!(first.number, "INV-0001");
        assert_eq!(first.due_date, day(5, 31));
        assert_eq!(first.status, InvoiceStatus::Pending);
        assert_eq!(second.number, "INV-0002");
        assert_eq!(service.require("inv-0002").unwrap().id, second.id);
    }

    #[test]
    fn test_pay_and_cancel() {
        let (_temp_dir, storage, client) = setup();
        let service = InvoiceService::new(&storage);
        let invoice = service
            .create(client.id, None, Money::from_units(500), day(5, 1), None, 30)
            .unwrap();

        let paid = service.pay(invoice.id, day(5, 20)).unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(paid.paid_date, Some(day(5, 20)));
        assert!(service.pay(invoice.id, day(5, 21)).unwrap_err().is_validation());
        assert!(service.cancel(invoice.id).unwrap_err().is_validation());
    }

    #[test]
    fn test_refresh_overdue() {
        let (_temp_dir, storage, client) = setup();
        let service = InvoiceService::new(&storage);
        let late = service
            .create(client.id, None, Money::from_units(100), day(4, 1), Some(day(4, 15)), 30)
            .unwrap();
        service
            .create(client.id, None, Money::from_units(100), day(5, 1), Some(day(6, 30)), 30)
            .unwrap();

        let changed = service.refresh_overdue(day(5, 1)).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, late.id);
        assert_eq!(service.list(Some(InvoiceStatus::Overdue)).unwrap().len(), 1);
        assert!(service.refresh_overdue(day(5, 1)).unwrap().is_empty());

        // Overdue invoices can still be paid
        assert!(service.pay(late.id, day(5, 2)).is_ok());
    }

    #[test]
    fn test_rejects_invalid_invoices() {
        let (_temp_dir, storage, client) = setup();
        let service = InvoiceService::new(&storage);

        assert!(service
            .create(client.id, None, Money::zero(), day(5, 1), None, 30)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(client.id, None, Money::from_units(1), day(5, 10), Some(day(5, 1)), 30)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(ClientId::new(), None, Money::from_units(1), day(5, 1), None, 30)
            .unwrap_err()
            .is_not_found());
    }
}
