//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Bill synthesis compares sums against a target with a ±5 tolerance.     │
//! │  A float comparison that drifts by 0.0000001 flips a bill from          │
//! │  "within tolerance" to "breach" for no real reason.                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupees                                           │
//! │    Counter prices in this market are whole rupees (Rs 45, Rs 80).       │
//! │    All sums, differences and tolerance checks are exact i64 math.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::money::Money;
//!
//! let price = Money::from_rupees(80);
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // Rs 160
//! let total = price + Money::from_rupees(45);     // Rs 125
//!
//! // Distance to a target, used everywhere in the engine
//! let target = Money::from_rupees(450);
//! assert_eq!(total.abs_diff(target), Money::from_rupees(325));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole rupees.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for signed differences
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// StockEntry.unit_price_rupees ──► BillLineItem.line_total ──┐
///                                                            ▼
/// TransactionRecord.target_total ──► |achieved − target| = difference
///                                                            │
///                                    tolerance check (±5) ◄──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let price = Money::from_rupees(80);
    /// assert_eq!(price.rupees(), 80);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees)
    }

    /// Returns the value in whole rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Absolute difference between two amounts.
    ///
    /// This is the engine's distance metric: every trial, escalation
    /// strategy and tolerance check compares `achieved.abs_diff(target)`.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let achieved = Money::from_rupees(448);
    /// let target = Money::from_rupees(450);
    /// assert_eq!(achieved.abs_diff(target), Money::from_rupees(2));
    /// assert_eq!(target.abs_diff(achieved), Money::from_rupees(2));
    /// ```
    #[inline]
    pub const fn abs_diff(&self, other: Money) -> Money {
        Money((self.0 - other.0).abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(45);
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.rupees(), 90);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-Rs {}", self.0.abs())
        } else {
            write!(f, "Rs {}", self.0)
        }
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of Money values (line totals → bill total).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees() {
        let money = Money::from_rupees(450);
        assert_eq!(money.rupees(), 450);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_rupees(80)), "Rs 80");
        assert_eq!(format!("{}", Money::from_rupees(-25)), "-Rs 25");
        assert_eq!(format!("{}", Money::zero()), "Rs 0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(100);
        let b = Money::from_rupees(45);

        assert_eq!((a + b).rupees(), 145);
        assert_eq!((a - b).rupees(), 55);
        let result: Money = a * 3;
        assert_eq!(result.rupees(), 300);
    }

    #[test]
    fn test_abs_diff_is_symmetric() {
        let achieved = Money::from_rupees(448);
        let target = Money::from_rupees(450);

        assert_eq!(achieved.abs_diff(target).rupees(), 2);
        assert_eq!(target.abs_diff(achieved).rupees(), 2);
        assert_eq!(target.abs_diff(target).rupees(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_rupees(5);
        assert!(positive.is_positive());

        let negative = Money::from_rupees(-5);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().rupees(), 5);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_rupees(60);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.rupees(), 120);
    }

    #[test]
    fn test_sum() {
        let lines = [
            Money::from_rupees(160),
            Money::from_rupees(90),
            Money::from_rupees(60),
        ];
        let total: Money = lines.iter().copied().sum();
        assert_eq!(total.rupees(), 310);
    }
}
