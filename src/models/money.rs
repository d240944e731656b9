//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that report totals are exact
//! and repeatable. Scaling by fractional quantities (hours, months) rounds
//! to the nearest cent at the point of scaling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount stored as cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use freelance_ledger::models::Money;
    /// let rate = Money::from_cents(10_000); // $100.00
    /// assert_eq!(rate.to_string(), "$100.00");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a fractional quantity, e.g. a rate by tracked hours
    pub fn scale(&self, factor: f64) -> Self {
        Self((self.0 as f64 * factor).round() as i64)
    }

    /// Divide by a fractional quantity, e.g. a fixed price by months.
    ///
    /// Returns `None` for a zero, negative or non-finite divisor.
    pub fn per(&self, divisor: f64) -> Option<Self> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return None;
        }
        Some(Self((self.0 as f64 / divisor).round() as i64))
    }

    /// Amount as a floating point number of currency units (for ratios and CSV)
    pub fn as_units_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a money amount from user or spreadsheet text
    ///
    /// Accepts "10.50", "-10.50", "$10.50", "1,250", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let cents = match cleaned.split_once('.') {
            Some((whole, frac)) => {
                let whole: i64 = if whole.is_empty() {
                    0
                } else {
                    whole.parse().map_err(|_| invalid())?
                };
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let frac_cents: i64 = match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => frac[..2].parse().map_err(|_| invalid())?,
                };
                whole
                    .checked_mul(100)
                    .and_then(|c| c.checked_add(frac_cents))
                    .ok_or_else(invalid)?
            }
            None => cleaned
                .parse::<i64>()
                .map_err(|_| invalid())?
                .checked_mul(100)
                .ok_or_else(invalid)?,
        };

        let cents = if negative {
            cents.checked_neg().ok_or_else(invalid)?
        } else {
            cents
        };
        Ok(Self(cents))
    }

    /// Format with a configurable currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
