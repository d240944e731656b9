//! Goal periods
//!
//! Resolves a period kind plus a year/month/quarter selector into a half-open
//! instant range `[start, end)`, counts the days left in it, and renders the
//! selector as a short label ("Jun 2024", "Q2 2024", "2024").

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Granularity of a goal's time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl FromStr for PeriodKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(LedgerError::InvalidPeriod(format!(
                "unknown period kind '{}' (expected monthly, quarterly or yearly)",
                s
            ))),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Half-open instant range: `start <= t < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Membership test for a calendar date, taken at its first instant
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(start_of_day(date))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Last calendar day inside the range
    pub fn last_date(&self) -> NaiveDate {
        (self.end - chrono::Duration::nanoseconds(1)).date_naive()
    }

    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        days_remaining(self.end, now)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date(), self.last_date())
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn first_of_month(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1).map(start_of_day)
}

/// Resolve a period selector into its `[start, end)` range.
///
/// `month` is only consulted for monthly periods and `quarter` only for
/// quarterly ones. A missing or out-of-range selector is an
/// [`LedgerError::InvalidPeriod`].
pub fn resolve(
    kind: PeriodKind,
    year: i32,
    month: Option<u32>,
    quarter: Option<u32>,
) -> LedgerResult<DateRange> {
    let out_of_range = || {
        LedgerError::InvalidPeriod(format!(
            "{} period for {} has no valid selector (month {:?}, quarter {:?})",
            kind, year, month, quarter
        ))
    };

    match kind {
        PeriodKind::Monthly => {
            let month = month.filter(|m| (1..=12).contains(m)).ok_or_else(out_of_range)?;
            let start = first_of_month(year, month).ok_or_else(out_of_range)?;
            let end = if month == 12 {
                first_of_month(year + 1, 1)
            } else {
                first_of_month(year, month + 1)
            }
            .ok_or_else(out_of_range)?;
            Ok(DateRange { start, end })
        }
        PeriodKind::Quarterly => {
            let quarter = quarter
                .filter(|q| (1..=4).contains(q))
                .ok_or_else(out_of_range)?;
            let first_month = (quarter - 1) * 3 + 1;
            let start_date = NaiveDate::from_ymd_opt(year, first_month, 1).ok_or_else(out_of_range)?;
            let end_date = start_date
                .checked_add_months(Months::new(3))
                .ok_or_else(out_of_range)?;
            Ok(DateRange {
                start: start_of_day(start_date),
                end: start_of_day(end_date),
            })
        }
        PeriodKind::Yearly => {
            let start = first_of_month(year, 1).ok_or_else(out_of_range)?;
            let end = first_of_month(year + 1, 1).ok_or_else(out_of_range)?;
            Ok(DateRange { start, end })
        }
    }
}

/// Whole days from `now` until `end`, never negative.
pub fn days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if end <= now {
        return 0;
    }
    (end - now).num_days()
}

/// Render a period selector as a short label.
///
/// A kind that does not parse, or a monthly/quarterly selector that is out of
/// range, renders as the bare year. Labels are display-only and must never
/// fail a report.
pub fn format_period(year: i32, month: Option<u32>, quarter: Option<u32>, kind: &str) -> String {
    match kind.parse::<PeriodKind>() {
        Ok(PeriodKind::Monthly) => match month.filter(|m| (1..=12).contains(m)) {
            Some(m) => format!("{} {}", MONTH_ABBREV[(m - 1) as usize], year),
            None => year.to_string(),
        },
        Ok(PeriodKind::Quarterly) => match quarter.filter(|q| (1..=4).contains(q)) {
            Some(q) => format!("Q{} {}", q, year),
            None => year.to_string(),
        },
        // Yearly, and the fallback for anything unrecognised
        Ok(PeriodKind::Yearly) | Err(_) => year.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn days_in_month(year: i32, month: u32) -> i64 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
            _ => 28,
        }
    }

    #[test]
    fn test_monthly_spans_days_in_month() {
        for year in [2023, 2024, 2100] {
            for month in 1..=12 {
                let range = resolve(PeriodKind::Monthly, year, Some(month), None).unwrap();
                assert_eq!(
                    (range.end - range.start).num_days(),
                    days_in_month(year, month),
                    "{}-{}",
                    year,
                    month
                );
                assert_eq!(range.start.day(), 1);
            }
        }
    }

    #[test]
    fn test_monthly_december_rolls_over() {
        let range = resolve(PeriodKind::Monthly, 2024, Some(12), None).unwrap();
        assert_eq!(range.end, instant(2025, 1, 1, 0));
    }

    #[test]
    fn test_quarterly_ranges() {
        for q in 1..=4u32 {
            let range = resolve(PeriodKind::Quarterly, 2024, None, Some(q)).unwrap();
            assert_eq!(range.start.month(), 3 * (q - 1) + 1);
            assert_eq!(range.start.day(), 1);
            let expected_end = range
                .start
                .date_naive()
                .checked_add_months(Months::new(3))
                .unwrap();
            assert_eq!(range.end.date_naive(), expected_end);
        }
        let q4 = resolve(PeriodKind::Quarterly, 2024, None, Some(4)).unwrap();
        assert_eq!(q4.end, instant(2025, 1, 1, 0));
    }

    #[test]
    fn test_yearly_range() {
        let range = resolve(PeriodKind::Yearly, 2024, Some(7), Some(3)).unwrap();
        assert_eq!(range.start, instant(2024, 1, 1, 0));
        assert_eq!(range.end, instant(2025, 1, 1, 0));
        assert_eq!(range.end.year(), range.start.year() + 1);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(matches!(
            resolve(PeriodKind::Monthly, 2024, None, None),
            Err(LedgerError::InvalidPeriod(_))
        ));
        assert!(matches!(
            resolve(PeriodKind::Monthly, 2024, Some(13), None),
            Err(LedgerError::InvalidPeriod(_))
        ));
        assert!(matches!(
            resolve(PeriodKind::Quarterly, 2024, None, Some(0)),
            Err(LedgerError::InvalidPeriod(_))
        ));
        assert!(matches!(
            "weekly".parse::<PeriodKind>(),
            Err(LedgerError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_half_open_membership() {
        let range = resolve(PeriodKind::Monthly, 2024, Some(6), None).unwrap();
        assert!(range.contains(instant(2024, 6, 1, 0)));
        assert!(range.contains(instant(2024, 6, 30, 23)));
        assert!(!range.contains(instant(2024, 7, 1, 0)));
        assert!(range.contains_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
        assert_eq!(range.last_date(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_june_goal_days_remaining() {
        let range = resolve(PeriodKind::Monthly, 2024, Some(6), None).unwrap();
        assert_eq!(range.start, instant(2024, 6, 1, 0));
        assert_eq!(range.end, instant(2024, 7, 1, 0));
        assert_eq!(range.days_remaining(instant(2024, 6, 20, 12)), 10);
        assert_eq!(range.days_remaining(instant(2024, 6, 20, 0)), 11);
    }

    #[test]
    fn test_days_remaining_clamps_and_never_increases() {
        let end = instant(2024, 7, 1, 0);
        let mut previous = i64::MAX;
        for hour in (0..24 * 40).step_by(7) {
            let now = instant(2024, 6, 1, 0) + chrono::Duration::hours(hour);
            let days = days_remaining(end, now);
            assert!(days >= 0);
            assert!(days <= previous);
            previous = days;
        }
        assert_eq!(days_remaining(end, end), 0);
        assert_eq!(days_remaining(end, instant(2024, 7, 4, 0)), 0);
    }

    #[test]
    fn test_format_period() {
        assert_eq!(format_period(2024, Some(6), None, "monthly"), "Jun 2024");
        assert_eq!(format_period(2024, Some(1), None, "monthly"), "Jan 2024");
        assert_eq!(format_period(2024, None, Some(1), "quarterly"), "Q1 2024");
        assert_eq!(format_period(2024, None, None, "yearly"), "2024");
    }

    #[test]
    fn test_format_period_falls_back_to_year() {
        assert_eq!(format_period(2024, Some(6), None, "fortnightly"), "2024");
        assert_eq!(format_period(2024, Some(13), None, "monthly"), "2024");
        assert_eq!(format_period(2024, None, None, "quarterly"), "2024");
    }
}
