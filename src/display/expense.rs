//! Expense display formatting

use std::collections::BTreeMap;

use tabled::Tabled;

use crate::models::{Expense, ExpenseCategory, Money};

use super::{format_date, render_table};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn format_expense_list(expenses: &[Expense], currency: &str, date_format: &str) -> String {
    let rows = expenses
        .iter()
        .map(|e| ExpenseRow {
            date: format_date(e.date, date_format),
            category: e.category.to_string(),
            amount: e.amount.format_with_symbol(currency),
            description: e.description.clone(),
        })
        .collect();
    let mut output = render_table(rows, "No expenses found.");

    if !expenses.is_empty() {
        let total: Money = expenses.iter().map(|e| e.amount).sum();
        output.push_str(&format!(
            "\n{} expense(s), total {}",
            expenses.len(),
            total.format_with_symbol(currency)
        ));
    }
    output
}

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total")]
    total: String,
}

pub fn format_category_totals(totals: &BTreeMap<ExpenseCategory, Money>, currency: &str) -> String {
    let rows = totals
        .iter()
        .map(|(category, total)| TotalRow {
            category: category.to_string(),
            total: total.format_with_symbol(currency),
        })
        .collect();
    render_table(rows, "No expenses found.")
}
