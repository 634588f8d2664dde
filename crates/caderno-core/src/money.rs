//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! `0.1 + 0.2 != 0.3` in floating point. Every amount in the register is a
//! count of centavos (`i64`); the database, the consolidation fold, and the
//! ledger all operate on integers. Conversion to reais happens only at the
//! presentation edge (plain text, JSON payloads, PDF).
//!
//! ## Usage
//! ```rust
//! use caderno_core::money::Money;
//!
//! let price = Money::from_cents(15);          // R$ 0.15
//! let line_total = price.multiply_quantity(15); // R$ 2.25
//! assert_eq!(line_total.cents(), 225);
//! assert_eq!(line_total.to_string(), "R$ 2.25");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: leaves room for corrections/refunds even though the
///   register currently only produces non-negative amounts
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Serde**: serializes as the raw centavo count (lossless)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use caderno_core::money::Money;
    ///
    /// let price = Money::from_cents(225); // R$ 2.25
    /// assert_eq!(price.cents(), 225);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-real portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a quantity.
    ///
    /// This is the line-subtotal calculation: unit price snapshot times the
    /// quantity sold.
    ///
    /// ## Example
    /// ```rust
    /// use caderno_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(15);
    /// assert_eq!(unit_price.multiply_quantity(15).cents(), 225);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the value in reais as a float.
    ///
    /// ## Display Only
    /// This exists for the JSON payloads, whose consumers format amounts
    /// with `toFixed(2)`. Never feed the result back into arithmetic.
    #[inline]
    pub fn as_reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays money as `R$ <reais>.<centavos>`, the caderno's own notation.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

/// Default money is zero.
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of Money values (totals across line items).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        let money = Money::from_cents(225);
        assert_eq!(money.cents(), 225);
        assert_eq!(money.reais(), 2);
        assert_eq!(money.cents_part(), 25);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(225)), "R$ 2.25");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5.00");
        assert_eq!(format!("{}", Money::from_cents(7)), "R$ 0.07");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_multiply_quantity_snapshot_price() {
        // The parafuso case: R$ 0.15 x 15 = R$ 2.25
        let unit_price = Money::from_cents(15);
        assert_eq!(unit_price.multiply_quantity(15).cents(), 225);
    }

    #[test]
    fn test_sum() {
        let total: Money = [10, 20, 30].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 60);
    }

    #[test]
    fn test_as_reais_display_conversion() {
        assert!((Money::from_cents(225).as_reais() - 2.25).abs() < 1e-9);
        assert_eq!(Money::zero().as_reais(), 0.0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());

        let positive = Money::from_cents(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
    }
}
