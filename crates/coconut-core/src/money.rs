//! # Money Module
//!
//! Provides the `Money` type for delivery fees and prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Zone fees were typed into forms as floats: 7.50, 10.00                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "7.50" is parsed once into 750 cents and stays an integer           │
//! │    through discounts, subtotals and fees.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coconut_core::money::Money;
//!
//! let fee = Money::parse_decimal("7.50").unwrap();
//! assert_eq!(fee.cents(), 750);
//!
//! let case_price = Money::from_cents(7500);
//! let subtotal = case_price.checked_multiply_quantity(4).unwrap();
//! assert_eq!(subtotal.to_string(), "$300.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount stored as integer cents.
///
/// Negative amounts are allowed; only fee and price validation rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use coconut_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(500).cents(), 500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount as entered in an admin form.
    ///
    /// Accepts an optional leading `$`, up to two fractional digits and
    /// surrounding whitespace. Returns `None` for anything else.
    ///
    /// ```rust
    /// use coconut_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("5").unwrap().cents(), 500);
    /// assert_eq!(Money::parse_decimal("$7.5").unwrap().cents(), 750);
    /// assert_eq!(Money::parse_decimal("10.00").unwrap().cents(), 1000);
    /// assert!(Money::parse_decimal("1.234").is_none());
    /// assert!(Money::parse_decimal("abc").is_none());
    /// ```
    pub fn parse_decimal(input: &str) -> Option<Money> {
        let s = input.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };

        let cents = whole.checked_mul(100)?.checked_add(frac)?;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cent portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit or case price by an order quantity.
    ///
    /// Returns `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the discount amount for a rate in basis points (500 = 5%).
    ///
    /// Rounds half up on the cent.
    ///
    /// ```rust
    /// use coconut_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(1999);
    /// assert_eq!(subtotal.percentage(500).cents(), 100); // 99.95 → 100
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let amount = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(amount as i64)
    }
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-style dollar rendering. Localised display belongs to the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(750);
        assert_eq!(money.cents(), 750);
        assert_eq!(money.dollars(), 7);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(750).to_string(), "$7.50");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("5.00"), Some(Money::from_cents(500)));
        assert_eq!(Money::parse_decimal(" 7.5 "), Some(Money::from_cents(750)));
        assert_eq!(Money::parse_decimal("$10"), Some(Money::from_cents(1000)));
        assert_eq!(Money::parse_decimal(".99"), Some(Money::from_cents(99)));
        assert_eq!(Money::parse_decimal("-2.25"), Some(Money::from_cents(-225)));

        assert_eq!(Money::parse_decimal(""), None);
        assert_eq!(Money::parse_decimal("."), None);
        assert_eq!(Money::parse_decimal("1.999"), None);
        assert_eq!(Money::parse_decimal("1,50"), None);
        assert_eq!(Money::parse_decimal("ten"), None);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert_eq!(a.checked_multiply_quantity(3).unwrap().cents(), 3000);
        assert_eq!(Money::from_cents(i64::MAX / 2).checked_multiply_quantity(3), None);

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total.cents(), 1250);
    }

    #[test]
    fn test_percentage() {
        // 5% of $150.00
        assert_eq!(Money::from_cents(15000).percentage(500).cents(), 750);
        // 15% of $0.50 = 7.5 cents → 8
        assert_eq!(Money::from_cents(50).percentage(1500).cents(), 8);
        assert!(Money::from_cents(1000).percentage(0).is_zero());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
