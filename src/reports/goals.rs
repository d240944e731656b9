//! Income goal progress
//!
//! Each goal is measured against paid invoices whose paid date falls inside
//! the goal's period. A goal whose period cannot be resolved is reported as a
//! failure next to the others rather than aborting the run.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::display::format_date;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{DateRange, GoalId, IncomeGoal, Invoice, InvoiceStatus, Money};
use crate::storage::Storage;

/// Progress of one goal at a given instant
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub label: String,
    pub description: String,
    pub range: DateRange,
    pub target: Money,
    pub earned: Money,
    /// Target minus earned, never below zero
    pub remaining: Money,
    /// Earned as a percentage of target
    pub percent: f64,
    pub days_remaining: i64,
}

impl GoalProgress {
    pub fn is_met(&self) -> bool {
        self.earned >= self.target
    }
}

/// A goal that could not be evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct GoalFailure {
    pub goal_id: GoalId,
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalsReport {
    pub generated_at: DateTime<Utc>,
    pub goals: Vec<GoalProgress>,
    pub failures: Vec<GoalFailure>,
}

/// Evaluate one goal against a set of invoices.
///
/// Only `Paid` invoices with a paid date count toward `earned`.
pub fn evaluate(goal: &IncomeGoal, invoices: &[Invoice], now: DateTime<Utc>) -> LedgerResult<GoalProgress> {
    let range = goal.date_range()?;

    let earned: Money = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Paid)
        .filter_map(|i| i.paid_date.map(|paid| (paid, i.amount)))
        .filter(|(paid, _)| range.contains_date(*paid))
        .map(|(_, amount)| amount)
        .sum();

    let remaining = if earned >= goal.amount {
        Money::zero()
    } else {
        goal.amount - earned
    };

    let percent = if goal.amount.is_zero() {
        0.0
    } else {
        earned.cents() as f64 / goal.amount.cents() as f64 * 100.0
    };

    Ok(GoalProgress {
        goal_id: goal.id,
        label: goal.label(),
        description: goal.description.clone(),
        range,
        target: goal.amount,
        earned,
        remaining,
        percent,
        days_remaining: range.days_remaining(now),
    })
}

impl GoalsReport {
    /// Evaluate every goal at the same instant
    pub fn aggregate(goals: &[IncomeGoal], invoices: &[Invoice], now: DateTime<Utc>) -> Self {
        let mut report = Self {
            generated_at: now,
            goals: Vec::with_capacity(goals.len()),
            failures: Vec::new(),
        };

        for goal in goals {
            match evaluate(goal, invoices, now) {
                Ok(progress) => report.goals.push(progress),
                Err(e) => {
                    tracing::warn!(goal = %goal.id, error = %e, "skipping goal");
                    report.failures.push(GoalFailure {
                        goal_id: goal.id,
                        label: goal.label(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    pub fn generate(storage: &Storage, now: DateTime<Utc>) -> LedgerResult<Self> {
        let goals = storage.goals.list_sorted()?;
        let invoices = storage.invoices.get_all()?;
        Ok(Self::aggregate(&goals, &invoices, now))
    }

    /// Format the report for terminal display. Met goals are marked.
    pub fn format_terminal(&self, currency: &str, date_format: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str("Income Goals\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:<23} {:>12} {:>12} {:>7} {:>10}\n",
            "Period", "Range", "Target", "Earned", "%", "Days left"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for goal in &self.goals {
            let range = format!(
                "{}..{}",
                format_date(goal.range.start_date(), date_format),
                format_date(goal.range.last_date(), date_format)
            );
            output.push_str(&format!(
                "{:<10} {:<23} {:>12} {:>12} {:>6.1}% {:>10}{}\n",
                goal.label,
                range,
                money(goal.target),
                money(goal.earned),
                goal.percent,
                goal.days_remaining,
                if goal.is_met() { "  met" } else { "" }
            ));
            if !goal.description.is_empty() {
                output.push_str(&format!("  {}\n", goal.description));
            }
        }

        if self.goals.is_empty() && self.failures.is_empty() {
            output.push_str("  No goals set\n");
        }

        for failure in &self.failures {
            output.push_str(&format!("{:<10} ERROR: {}\n", failure.label, failure.reason));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W, date_format: &str) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| LedgerError::Export(e.to_string());

        csv.write_record([
            "Period", "Start", "End", "Target", "Earned", "Remaining", "Percent", "Days Remaining",
        ])
        .map_err(export_err)?;

        for goal in &self.goals {
            csv.write_record(&[
                goal.label.clone(),
                format_date(goal.range.start_date(), date_format),
                format_date(goal.range.last_date(), date_format),
                format!("{:.2}", goal.target.as_units_f64()),
                format!("{:.2}", goal.earned.as_units_f64()),
                format!("{:.2}", goal.remaining.as_units_f64()),
                format!("{:.1}", goal.percent),
                goal.days_remaining.to_string(),
            ])
            .map_err(export_err)?;
        }

        csv.flush()
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        Ok(())
    }
}
