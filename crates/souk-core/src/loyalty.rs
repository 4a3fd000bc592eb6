//! # Loyalty Points
//!
//! Point accrual for registered customers.
//!
//! ## Integer-Only Accrual
//! Points are earned in proportion to the amount spent, which rarely lands
//! on a whole point. Instead of floating point, accrual works in
//! "point-cents" (hundredths of a point):
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  total 12.50 MAD, rate 1 point per unit                         │
//! │                                                                 │
//! │  raw     = 1250 cents × 10000 bps / 10000  = 1250 point-cents   │
//! │  carry   = customer.points_remainder (0..=99)                   │
//! │  whole   = (carry + raw) / 100             → earned points      │
//! │  new carry = (carry + raw) % 100           → stays on customer  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fractional part is never discarded: it rides on the customer record
//! as `points_remainder` and counts toward the next purchase.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, PointsInfo};

// =============================================================================
// Loyalty Rate
// =============================================================================

/// Accrual rate in basis points of a point per currency unit.
///
/// 10000 bps = 1 point per currency unit spent. Same fixed-point
/// convention as `TaxRate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoyaltyRate(u32);

impl LoyaltyRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        LoyaltyRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Points earned per currency unit, for display.
    #[inline]
    pub fn points_per_unit(&self) -> f64 {
        self.0 as f64 / 10000.0
    }
}

impl Default for LoyaltyRate {
    /// One point per currency unit spent.
    fn default() -> Self {
        LoyaltyRate(10000)
    }
}

// =============================================================================
// Accrual
// =============================================================================

/// Result of computing accrual for one sale.
///
/// `info` travels on the `Sale` record; `remainder` replaces the
/// customer's `points_remainder` when the sale commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsAccrual {
    pub info: PointsInfo,
    /// Fractional carry after this sale, in point-cents (0..=99).
    pub remainder: i64,
}

/// Computes the loyalty movement a sale produces for a customer.
///
/// Pure function of the customer's current balance and carry. The commit
/// workflow applies `info.new_total` verbatim and never recomputes this,
/// so the guarantee `new_total == previous + earned` is established here
/// and nowhere else.
pub fn accrue(customer: &Customer, total: Money, rate: LoyaltyRate) -> PointsAccrual {
    // point-cents = cents × bps / 10000, truncating
    let raw = (total.cents() as i128 * rate.bps() as i128 / 10_000) as i64;
    let carried = customer.points_remainder + raw;

    let earned = carried / 100;
    let remainder = carried % 100;

    PointsAccrual {
        info: PointsInfo {
            previous: customer.points,
            earned,
            new_total: customer.points + earned,
        },
        remainder,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
