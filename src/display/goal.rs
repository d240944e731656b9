//! Goal display formatting

use tabled::Tabled;

use crate::models::IncomeGoal;

use super::render_table;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn format_goal_list(goals: &[IncomeGoal], currency: &str) -> String {
    let rows = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.short(),
            period: g.label(),
            target: g.amount.format_with_symbol(currency),
            description: g.description.clone(),
        })
        .collect();
    render_table(rows, "No goals set.")
}
