//! Reports
//!
//! - `revenue`: per-contract monthly revenue normalization
//! - `dashboard`: revenue subtotals, unpaid exposure and hours across all
//!   active contracts
//! - `goals`: income goal progress
//!
//! Every report takes the current instant as an argument and is a pure
//! function of its inputs and that instant.

pub mod dashboard;
pub mod goals;
pub mod revenue;

pub use dashboard::DashboardReport;
pub use goals::{GoalFailure, GoalProgress, GoalsReport};
pub use revenue::{MonthlyRevenue, RevenueBasis, RevenueLine, RevenuePolicy};
