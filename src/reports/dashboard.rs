//! Dashboard report
//!
//! Folds normalized revenue across all active contracts into per-billing-model
//! subtotals and a grand total, alongside client, invoice and hours figures.

use std::collections::HashMap;
use std::io::Write;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::display::format_date;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    BillingType, Client, ClientId, Contract, ContractId, Invoice, InvoiceStatus, Money,
    TrackingSession,
};
use crate::storage::Storage;

use super::revenue::{self, RevenueLine, RevenuePolicy};

/// Snapshot of the business at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub lines: Vec<RevenueLine>,
    pub hourly_total: Money,
    pub retainer_total: Money,
    pub fixed_total: Money,
    pub total: Money,
    pub client_count: usize,
    pub active_contract_count: usize,
    /// Invoices in `Pending` status
    pub pending_invoice_count: usize,
    pub overdue_invoice_count: usize,
    /// Sum of `Pending` and `Overdue` invoice amounts
    pub unpaid_amount: Money,
    /// Billable hours behind the hourly total
    pub total_billable_hours: f64,
    /// `None` when no billable hours were tracked in the window
    pub average_hourly_rate: Option<Money>,
    /// Active contracts whose rate or price is not set
    pub contracts_missing_amount: usize,
}

impl DashboardReport {
    /// Build the report from already-loaded records.
    ///
    /// Inactive contracts are skipped. Lines are ordered by contract start
    /// date, then name, so repeated runs over the same data are identical.
    pub fn aggregate(
        clients: &[Client],
        contracts: &[Contract],
        sessions_by_contract: &HashMap<ContractId, Vec<TrackingSession>>,
        invoices_by_status: &HashMap<InvoiceStatus, Vec<Invoice>>,
        policy: &RevenuePolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let client_names: HashMap<ClientId, &str> =
            clients.iter().map(|c| (c.id, c.name.as_str())).collect();

        let mut active: Vec<&Contract> = contracts.iter().filter(|c| c.active).collect();
        active.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut report = Self {
            generated_at: now,
            lines: Vec::with_capacity(active.len()),
            hourly_total: Money::zero(),
            retainer_total: Money::zero(),
            fixed_total: Money::zero(),
            total: Money::zero(),
            client_count: clients.iter().filter(|c| !c.archived).count(),
            active_contract_count: active.len(),
            pending_invoice_count: 0,
            overdue_invoice_count: 0,
            unpaid_amount: Money::zero(),
            total_billable_hours: 0.0,
            average_hourly_rate: None,
            contracts_missing_amount: 0,
        };

        for contract in active {
            let sessions = sessions_by_contract
                .get(&contract.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let monthly = revenue::normalize(contract, sessions, policy, now);

            if monthly.missing_amount {
                report.contracts_missing_amount += 1;
                tracing::warn!(
                    contract = %contract.id,
                    name = %contract.name,
                    billing = %contract.billing_type(),
                    "contract has no rate or price; counted as zero revenue"
                );
            }
            if let Some(hours) = monthly.billable_hours {
                report.total_billable_hours += hours;
            }

            match contract.billing_type() {
                BillingType::Hourly => report.hourly_total += monthly.amount,
                BillingType::Retainer => report.retainer_total += monthly.amount,
                BillingType::FixedPrice => report.fixed_total += monthly.amount,
            }
            report.total += monthly.amount;

            let client_name = match client_names.get(&contract.client_id) {
                Some(name) => name.to_string(),
                None => {
                    tracing::debug!(contract = %contract.id, "contract references an unknown client");
                    "(unknown client)".to_string()
                }
            };

            report.lines.push(RevenueLine {
                contract_id: contract.id,
                contract_name: contract.name.clone(),
                client_id: contract.client_id,
                client_name,
                billing_type: contract.billing_type(),
                monthly_amount: monthly.amount,
                basis: monthly.basis,
            });
        }

        let invoices_with = |status: InvoiceStatus| {
            invoices_by_status
                .get(&status)
                .map(Vec::as_slice)
                .unwrap_or(&[])
        };
        report.pending_invoice_count = invoices_with(InvoiceStatus::Pending).len();
        report.overdue_invoice_count = invoices_with(InvoiceStatus::Overdue).len();
        report.unpaid_amount = [InvoiceStatus::Pending, InvoiceStatus::Overdue]
            .into_iter()
            .flat_map(|status| invoices_with(status).iter())
            .map(|invoice| invoice.amount)
            .sum();

        if report.total_billable_hours > 0.0 {
            report.average_hourly_rate = report.hourly_total.per(report.total_billable_hours);
        }

        tracing::debug!(
            contracts = report.active_contract_count,
            total = %report.total,
            "dashboard aggregated"
        );

        report
    }

    /// Load everything from storage and aggregate it at `now`
    pub fn generate(storage: &Storage, settings: &Settings, now: DateTime<Utc>) -> LedgerResult<Self> {
        let clients = storage.clients.get_all()?;
        let contracts = storage.contracts.get_active()?;
        let sessions = storage.sessions.grouped_by_contract()?;
        let invoices = storage.invoices.grouped_by_status()?;

        Ok(Self::aggregate(
            &clients,
            &contracts,
            &sessions,
            &invoices,
            &settings.revenue_policy(),
            now,
        ))
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str, date_format: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str(&format!(
            "Dashboard ({} {})\n",
            format_date(self.generated_at.date_naive(), date_format),
            self.generated_at.format("%H:%M UTC")
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Clients: {}   Active contracts: {}\n\n",
            self.client_count, self.active_contract_count
        ));

        output.push_str(&format!(
            "{:<24} {:<18} {:<12} {:>12}  {}\n",
            "Contract", "Client", "Billing", "Monthly", "Detail"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for line in &self.lines {
            output.push_str(&format!(
                "{:<24} {:<18} {:<12} {:>12}  {}\n",
                truncate(&line.contract_name, 24),
                truncate(&line.client_name, 18),
                line.billing_type.to_string(),
                money(line.monthly_amount),
                line.basis.describe(currency)
            ));
        }
        if self.lines.is_empty() {
            output.push_str("  No active contracts\n");
        }
        output.push_str(&"-".repeat(80));
        output.push('\n');

        output.push_str(&format!("{:<56} {:>12}\n", "Hourly", money(self.hourly_total)));
        output.push_str(&format!("{:<56} {:>12}\n", "Retainer", money(self.retainer_total)));
        output.push_str(&format!("{:<56} {:>12}\n", "Fixed price", money(self.fixed_total)));
        output.push_str(&format!("{:<56} {:>12}\n\n", "MONTHLY REVENUE", money(self.total)));

        output.push_str(&format!(
            "Billable hours (last window): {:.1}\n",
            self.total_billable_hours
        ));
        match self.average_hourly_rate {
            Some(rate) => output.push_str(&format!("Average hourly rate: {}/hr\n", money(rate))),
            None => output.push_str("Average hourly rate: n/a\n"),
        }
        output.push_str(&format!(
            "Unpaid invoices: {} ({} pending, {} overdue)\n",
            money(self.unpaid_amount),
            self.pending_invoice_count,
            self.overdue_invoice_count
        ));

        if self.contracts_missing_amount > 0 {
            output.push_str(&format!(
                "\nWarning: {} contract(s) have no rate or price set and count as zero\n",
                self.contracts_missing_amount
            ));
        }

        output
    }

    /// Export the revenue lines and totals as CSV.
    ///
    /// Amounts are plain numbers; `currency` only appears in the detail column.
    pub fn export_csv<W: Write>(&self, writer: W, currency: &str) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| LedgerError::Export(e.to_string());

        csv.write_record(["Contract", "Client", "Billing Type", "Monthly Amount", "Detail"])
            .map_err(export_err)?;
        for line in &self.lines {
            let billing_type = line.billing_type.to_string();
            let amount = format!("{:.2}", line.monthly_amount.as_units_f64());
            let detail = line.basis.describe(currency);
            csv.write_record([
                line.contract_name.as_str(),
                line.client_name.as_str(),
                billing_type.as_str(),
                amount.as_str(),
                detail.as_str(),
            ])
            .map_err(export_err)?;
        }

        for (label, amount) in [
            ("HOURLY", self.hourly_total),
            ("RETAINER", self.retainer_total),
            ("FIXED PRICE", self.fixed_total),
            ("TOTAL", self.total),
            ("UNPAID", self.unpaid_amount),
        ] {
            let amount = format!("{:.2}", amount.as_units_f64());
            csv.write_record([label, "", "", amount.as_str(), ""])
                .map_err(export_err)?;
        }

        csv.flush()
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::BillingTerms;
    use chrono::{Duration, NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn invoice(client: ClientId, units: i64, status: InvoiceStatus) -> Invoice {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut invoice = Invoice::new("INV", client, Money::from_units(units), d, d);
        invoice.status = status;
        invoice
    }

    struct Fixture {
        clients: Vec<Client>,
        contracts: Vec<Contract>,
        sessions: HashMap<ContractId, Vec<TrackingSession>>,
        invoices: HashMap<InvoiceStatus, Vec<Invoice>>,
    }

    /// Hourly $100 x 10h, retainer $2000, fixed $3000 with no end date
    fn scenario() -> Fixture {
        let acme = Client::new("Acme");
        let globex = Client::new("Globex");

        let hourly = Contract::new(
            "Consulting",
            acme.id,
            BillingTerms::hourly(Money::from_units(100)),
            start(),
        );
        let retainer = Contract::new(
            "Support",
            globex.id,
            BillingTerms::retainer(Money::from_units(2000)),
            start(),
        );
        let fixed = Contract::new(
            "Website",
            globex.id,
            BillingTerms::fixed_price(Money::from_units(3000)),
            start(),
        );

        let mut sessions = HashMap::new();
        sessions.insert(
            hourly.id,
            vec![
                TrackingSession::logged(hourly.id, now() - Duration::days(3), 6.0, true),
                TrackingSession::logged(hourly.id, now() - Duration::days(12), 4.0, true),
            ],
        );

        let mut invoices = HashMap::new();
        invoices.insert(
            InvoiceStatus::Pending,
            vec![
                invoice(acme.id, 500, InvoiceStatus::Pending),
                invoice(acme.id, 250, InvoiceStatus::Pending),
            ],
        );
        invoices.insert(
            InvoiceStatus::Overdue,
            vec![invoice(globex.id, 1000, InvoiceStatus::Overdue)],
        );
        invoices.insert(
            InvoiceStatus::Paid,
            vec![invoice(globex.id, 9999, InvoiceStatus::Paid)],
        );

        Fixture {
            clients: vec![acme, globex],
            contracts: vec![fixed, retainer, hourly],
            sessions,
            invoices,
        }
    }

    fn run(f: &Fixture) -> DashboardReport {
        DashboardReport::aggregate(
            &f.clients,
            &f.contracts,
            &f.sessions,
            &f.invoices,
            &RevenuePolicy::default(),
            now(),
        )
    }

    #[test]
    fn test_three_billing_models_scenario() {
        let report = run(&scenario());

        assert_eq!(report.hourly_total, Money::from_units(1000));
        assert_eq!(report.retainer_total, Money::from_units(2000));
        assert_eq!(report.fixed_total, Money::from_units(1000));
        assert_eq!(report.total, Money::from_units(4000));
        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.active_contract_count, 3);
        assert_eq!(report.client_count, 2);
    }

    #[test]
    fn test_invoice_exposure() {
        let report = run(&scenario());

        assert_eq!(report.pending_invoice_count, 2);
        assert_eq!(report.overdue_invoice_count, 1);
        assert_eq!(report.unpaid_amount, Money::from_units(1750));
    }

    #[test]
    fn test_average_hourly_rate() {
        let report = run(&scenario());
        assert_eq!(report.total_billable_hours, 10.0);
        assert_eq!(report.average_hourly_rate, Some(Money::from_units(100)));
    }

    #[test]
    fn test_no_hours_means_no_average() {
        let mut f = scenario();
        f.sessions.clear();
        let report = run(&f);
        assert_eq!(report.total_billable_hours, 0.0);
        assert_eq!(report.average_hourly_rate, None);
        assert_eq!(report.hourly_total, Money::zero());
    }

    #[test]
    fn test_deterministic() {
        let f = scenario();
        assert_eq!(run(&f), run(&f));

        let names: Vec<_> = run(&f).lines.iter().map(|l| l.contract_name.clone()).collect();
        assert_eq!(names, vec!["Consulting", "Support", "Website"]);
    }

    #[test]
    fn test_inactive_and_unpriced_contracts() {
        let mut f = scenario();
        f.contracts[0].deactivate();
        f.contracts.push(Contract::new(
            "Unpriced",
            f.clients[0].id,
            BillingTerms::Hourly { rate: None },
            start(),
        ));
        let unpriced = f.contracts[3].id;
        f.sessions
            .insert(unpriced, vec![TrackingSession::logged(unpriced, now(), 2.0, true)]);

        let report = run(&f);
        assert_eq!(report.fixed_total, Money::zero());
        assert_eq!(report.total, Money::from_units(3000));
        assert_eq!(report.active_contract_count, 3);
        assert_eq!(report.contracts_missing_amount, 1);
        assert_eq!(report.total_billable_hours, 10.0);
    }

    #[test]
    fn test_empty_inputs() {
        let report = DashboardReport::aggregate(
            &[],
            &[],
            &HashMap::new(),
            &HashMap::new(),
            &RevenuePolicy::default(),
            now(),
        );
        assert_eq!(report.total, Money::zero());
        assert!(report.lines.is_empty());
        assert!(report.format_terminal("$", "%Y-%m-%d").contains("No active contracts"));
    }

    #[test]
    fn test_format_and_export() {
        let report = run(&scenario());

        let text = report.format_terminal("$", "%Y-%m-%d");
        assert!(text.contains("MONTHLY REVENUE"));
        assert!(text.contains("$4000.00"));
        assert!(text.contains("10.0h @ $100.00/hr"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf, "$").unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.starts_with("Contract,Client,Billing Type,Monthly Amount,Detail\n"));
        assert!(csv.contains("Support,Globex,Retainer,2000.00,Monthly retainer"));
        assert!(csv.contains("TOTAL,,,4000.00,"));
    }

    #[test]
    fn test_currency_symbol_is_consistent() {
        let report = run(&scenario());

        let text = report.format_terminal("€", "%Y-%m-%d");
        assert!(text.contains("€4000.00"));
        assert!(text.contains("10.0h @ €100.00/hr"));
        assert!(!text.contains('$'));

        let mut buf = Vec::new();
        report.export_csv(&mut buf, "€").unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("10.0h @ €100.00/hr"));
        assert!(!csv.contains('$'));
    }

    #[test]
    fn test_generate_from_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let f = scenario();
        for client in &f.clients {
            storage.clients.upsert(client.clone()).unwrap();
        }
        for contract in &f.contracts {
            storage.contracts.upsert(contract.clone()).unwrap();
        }
        for session in f.sessions.values().flatten() {
            storage.sessions.upsert(session.clone()).unwrap();
        }

        let report = DashboardReport::generate(&storage, &Settings::default(), now()).unwrap();
        assert_eq!(report.total, Money::from_units(4000));
        assert_eq!(report.unpaid_amount, Money::zero());
    }
}
