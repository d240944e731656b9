//! Revenue normalization
//!
//! Turns one contract, whatever its billing model, into a comparable
//! monthly revenue figure plus a short human-readable explanation.
//!
//! - Hourly: billable hours started in the trailing window, times the rate.
//! - Retainer: the monthly fee as-is.
//! - Fixed price: the total spread over the contract's length in whole
//!   30-day months, or over the fallback month count when the contract has
//!   no end date or is shorter than one month.
//!
//! A missing rate or price is a data gap, not an error: the contract
//! contributes zero and [`MonthlyRevenue::missing_amount`] is set.
//!
//! The explanation is kept structured as a [`RevenueBasis`] and only turned
//! into text when rendered, so it uses the same currency symbol as the
//! amounts next to it.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::settings::{DEFAULT_FIXED_PRICE_FALLBACK_MONTHS, DEFAULT_HOURLY_WINDOW_DAYS};
use crate::models::{BillingTerms, BillingType, ClientId, Contract, ContractId, Money, TrackingSession};

/// Business constants the normalizer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenuePolicy {
    /// Length of the trailing window hourly sessions are summed over
    pub hourly_window_days: i64,
    /// Divisor for fixed-price contracts without a usable duration
    pub fixed_price_fallback_months: u32,
}

impl Default for RevenuePolicy {
    fn default() -> Self {
        Self {
            hourly_window_days: i64::from(DEFAULT_HOURLY_WINDOW_DAYS),
            fixed_price_fallback_months: DEFAULT_FIXED_PRICE_FALLBACK_MONTHS,
        }
    }
}

/// What a monthly figure was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevenueBasis {
    /// Billable hours in the window at an hourly rate
    Hours { hours: f64, rate: Money },
    Retainer,
    /// A fixed total spread over some months
    FixedTotal { total: Money },
    /// The rate or price this billing model needs was not set
    MissingAmount(BillingType),
}

impl RevenueBasis {
    /// Short explanation, e.g. "10.0h @ $100.00/hr"
    pub fn describe(&self, currency: &str) -> String {
        match self {
            Self::Hours { hours, rate } => {
                format!("{:.1}h @ {}/hr", hours, rate.format_with_symbol(currency))
            }
            Self::Retainer => "Monthly retainer".to_string(),
            Self::FixedTotal { total } => format!("{} total", total.format_with_symbol(currency)),
            Self::MissingAmount(BillingType::Hourly) => "No hourly rate set".to_string(),
            Self::MissingAmount(BillingType::Retainer) => "No retainer fee set".to_string(),
            Self::MissingAmount(BillingType::FixedPrice) => "No fixed price set".to_string(),
        }
    }
}

/// Normalized revenue of one contract
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    pub amount: Money,
    pub basis: RevenueBasis,
    /// Hours behind an hourly figure. `None` for other billing models and
    /// for hourly contracts without a rate, so they stay out of the
    /// average-rate calculation.
    pub billable_hours: Option<f64>,
    /// The rate or price this billing model needs was not set
    pub missing_amount: bool,
}

impl MonthlyRevenue {
    fn missing(billing_type: BillingType) -> Self {
        Self {
            amount: Money::zero(),
            basis: RevenueBasis::MissingAmount(billing_type),
            billable_hours: None,
            missing_amount: true,
        }
    }
}

/// One row of the dashboard's revenue table
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueLine {
    pub contract_id: ContractId,
    pub contract_name: String,
    pub client_id: ClientId,
    pub client_name: String,
    pub billing_type: BillingType,
    pub monthly_amount: Money,
    pub basis: RevenueBasis,
}

/// Compute the monthly revenue of `contract`.
///
/// `sessions` only matter for hourly contracts; any sessions belonging to
/// other contracts are ignored. `now` anchors the hourly window.
pub fn normalize(
    contract: &Contract,
    sessions: &[TrackingSession],
    policy: &RevenuePolicy,
    now: DateTime<Utc>,
) -> MonthlyRevenue {
    match contract.billing {
        BillingTerms::Hourly { rate } => {
            let own = sessions.iter().filter(|s| s.contract_id == contract.id);
            hourly_revenue(rate, own, policy, now)
        }
        BillingTerms::Retainer { monthly_fee } => retainer_revenue(monthly_fee),
        BillingTerms::FixedPrice { total } => {
            fixed_price_revenue(total, contract.start_date, contract.end_date, policy)
        }
    }
}

/// Sum of billable hours for sessions started within `[now - window, now]`
pub fn hours_in_window<'a>(
    sessions: impl IntoIterator<Item = &'a TrackingSession>,
    window_days: i64,
    now: DateTime<Utc>,
) -> f64 {
    let window_start = now - Duration::days(window_days);
    sessions
        .into_iter()
        .filter(|s| s.start >= window_start && s.start <= now)
        .filter_map(TrackingSession::billable_hours)
        .sum()
}

fn hourly_revenue<'a>(
    rate: Option<Money>,
    sessions: impl IntoIterator<Item = &'a TrackingSession>,
    policy: &RevenuePolicy,
    now: DateTime<Utc>,
) -> MonthlyRevenue {
    let Some(rate) = rate else {
        return MonthlyRevenue::missing(BillingType::Hourly);
    };

    let hours = hours_in_window(sessions, policy.hourly_window_days, now);
    MonthlyRevenue {
        amount: rate.scale(hours),
        basis: RevenueBasis::Hours { hours, rate },
        billable_hours: Some(hours),
        missing_amount: false,
    }
}

fn retainer_revenue(monthly_fee: Option<Money>) -> MonthlyRevenue {
    match monthly_fee {
        Some(fee) => MonthlyRevenue {
            amount: fee,
            basis: RevenueBasis::Retainer,
            billable_hours: None,
            missing_amount: false,
        },
        None => MonthlyRevenue::missing(BillingType::Retainer),
    }
}

fn fixed_price_revenue(
    total: Option<Money>,
    start: NaiveDate,
    end: Option<NaiveDate>,
    policy: &RevenuePolicy,
) -> MonthlyRevenue {
    let Some(total) = total else {
        return MonthlyRevenue::missing(BillingType::FixedPrice);
    };

    let months = proration_months(start, end, policy);
    MonthlyRevenue {
        amount: total.per(f64::from(months)).unwrap_or_else(Money::zero),
        basis: RevenueBasis::FixedTotal { total },
        billable_hours: None,
        missing_amount: false,
    }
}

/// Whole 30-day months a fixed price is spread over
pub fn proration_months(start: NaiveDate, end: Option<NaiveDate>, policy: &RevenuePolicy) -> u32 {
    let fallback = policy.fixed_price_fallback_months.max(1);
    match end {
        Some(end) => match u32::try_from((end - start).num_days() / 30) {
            Ok(months) if months > 0 => months,
            _ => fallback,
        },
        None => fallback,
    }
}
