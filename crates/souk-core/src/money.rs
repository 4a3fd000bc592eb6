//! # Money Module
//!
//! Integer-cent monetary values and the arithmetic a checkout needs.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Floats drift:  0.1 + 0.2 = 0.30000000000000004                         │
//! │                                                                         │
//! │  A register that sums thousands of line items per day cannot carry     │
//! │  that drift into the cash drawer. Every amount in this crate is an     │
//! │  i64 count of the smallest currency unit:                              │
//! │                                                                         │
//! │    12.50 MAD  ──►  Money(1250)                                         │
//! │    split 3 ways ──► 416 + 416 + 416 = 1248, remainder 2 is visible     │
//! │                                                                         │
//! │  Rounding happens in exactly one place (basis-point math below), and   │
//! │  any lost centime is lost on purpose where we can see it.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use souk_core::money::Money;
//!
//! let unit = Money::from_cents(1250);           // 12.50
//! let line = unit * 2;                          // 25.00
//! let with_bag = line + Money::from_cents(100); // 26.00
//! assert_eq!(with_bag.cents(), 2600);
//! ```
//!
//! There is deliberately no constructor from `f64`. The currency itself
//! (dirham, euro, ...) is a display concern carried by
//! `AppSettings::currency`; `Money` is unit-agnostic integer subunits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// An amount of money in the smallest currency unit.
///
/// Signed so refund and discount math stays in one type. The wrapped i64
/// serializes as a bare integer, which keeps snapshot payloads and the
/// generated TypeScript bindings trivial.
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► CartItem line total ──► Cart subtotal
///                                                │
///         Sale.total ◄── discount ◄── tax ◄──────┘
///              │
///              ├──► Customer.total_spent (accumulated per commit)
///              └──► loyalty accrual (points per currency unit)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Wraps a raw cent count.
    ///
    /// ## Example
    /// ```rust
    /// use souk_core::money::Money;
    ///
    /// let price = Money::from_cents(1250);
    /// assert_eq!(price.cents(), 1250); // 12.50
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Builds an amount from major and minor units.
    ///
    /// A negative amount carries its sign on the major unit only:
    /// `from_parts(-5, 50)` is -5.50, not -4.50.
    ///
    /// ## Example
    /// ```rust
    /// use souk_core::money::Money;
    ///
    /// assert_eq!(Money::from_parts(12, 50).cents(), 1250);
    /// assert_eq!(Money::from_parts(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_parts(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// The raw cent count.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Leftover cents, 0..=99 regardless of sign.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// True for exactly zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True for amounts above zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// True for amounts below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Magnitude of the amount.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Tax due on this amount at the given rate.
    ///
    /// Basis-point integer math: `(cents × bps + 5000) / 10000`. The +5000
    /// lifts the half-cent boundary so 0.825 becomes 0.83 instead of
    /// truncating; the i128 intermediate cannot overflow for any i64 amount.
    ///
    /// ## Example
    /// ```rust
    /// use souk_core::money::Money;
    /// use souk_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(1000);  // 10.00
    /// let rate = TaxRate::from_bps(2000);      // 20%
    ///
    /// assert_eq!(subtotal.calculate_tax(rate).cents(), 200);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Line total for `qty` units at this unit price.
    ///
    /// ## Example
    /// ```rust
    /// use souk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as "major.minor" with a leading sign when negative.
///
/// Used in logs and error messages only; the currency symbol and locale
/// formatting belong to whatever shell renders `AppSettings::currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Defaults to zero.
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

/// Scaling by an integer quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over iterators of Money (cart subtotals, revenue tallies).
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
    fn test_cents_and_parts() {
        let price = Money::from_cents(1250);
        assert_eq!(price.cents(), 1250);
        assert_eq!(price.major(), 12);
        assert_eq!(price.minor(), 50);

        assert_eq!(Money::from_parts(12, 50), price);
        assert_eq!(Money::from_parts(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1250).to_string(), "12.50");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(3).to_string(), "0.03");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_operators() {
        let mut till = Money::from_cents(10_000);
        till += Money::from_cents(1250);
        assert_eq!(till.cents(), 11_250);

        till -= Money::from_cents(250);
        assert_eq!(till.cents(), 11_000);

        assert_eq!((till - Money::from_cents(1000)).cents(), 10_000);
        assert_eq!((Money::from_cents(299) * 3).cents(), 897);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 75]
            .iter()
            .map(|c| Money::from_cents(*c))
            .sum();
        assert_eq!(total.cents(), 425);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_tax_whole_percent() {
        // 10.00 at 10% = 1.00
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 100);
    }

    #[test]
    fn test_tax_half_cent_rounds_up() {
        // 10.00 at 8.25% = 0.825 → 0.83 via the +5000 adjustment
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);
    }

    #[test]
    fn test_tax_zero_rate() {
        let amount = Money::from_cents(9999);
        assert!(amount.calculate_tax(TaxRate::zero()).is_zero());
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());

        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-550).abs().cents(), 550);
    }

    #[test]
    fn test_multiply_quantity() {
        let line = Money::from_cents(450).multiply_quantity(4);
        assert_eq!(line.cents(), 1800);
        assert_eq!(Money::from_cents(450).multiply_quantity(0), Money::zero());
    }

    /// Splitting an amount loses remainder cents visibly, never silently.
    #[test]
    fn test_split_keeps_remainder_visible() {
        let bill = Money::from_cents(2500);
        let share = Money::from_cents(2500 / 3); // 833 each
        let covered: Money = share * 3; // 2499

        assert_eq!(covered.cents(), 2499);
        assert_eq!((bill - covered).cents(), 1);
    }
}
