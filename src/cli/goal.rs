//! Income goal CLI commands

use chrono::{Datelike, Utc};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_goal_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::PeriodKind;
use crate::services::GoalService;
use crate::storage::Storage;

use super::{confirm, parse_money};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Set an income goal
    Add {
        /// Period kind: monthly, quarterly or yearly
        kind: String,
        /// Target amount
        amount: String,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month 1-12 (monthly goals)
        #[arg(short, long)]
        month: Option<u32>,
        /// Quarter 1-4 (quarterly goals)
        #[arg(short, long)]
        quarter: Option<u32>,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List goals
    List,
    /// Remove a goal
    Remove {
        /// Goal ID
        goal: String,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> LedgerResult<()> {
    let service = GoalService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Add {
            kind,
            amount,
            year,
            month,
            quarter,
            description,
        } => {
            let kind: PeriodKind = kind.parse()?;
            let year = year.unwrap_or_else(|| Utc::now().year());
            let goal = service.add(kind, parse_money(&amount)?, year, month, quarter, &description)?;
            println!(
                "Set {} goal for {}: {}",
                kind,
                goal.label(),
                goal.amount.format_with_symbol(currency)
            );
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            let goals = service.list()?;
            println!("{}", format_goal_list(&goals, currency));
        }

        GoalCommands::Remove { goal, yes } => {
            let goal = service
                .find(&goal)?
                .ok_or_else(|| LedgerError::goal_not_found(&goal))?;
            if !confirm(&format!("Remove goal {}?", goal.label()), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            let removed = service.remove(goal.id)?;
            println!("Removed goal {}", removed.label());
        }
    }

    Ok(())
}
