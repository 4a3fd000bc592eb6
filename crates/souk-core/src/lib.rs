//! # souk-core: Pure Business Logic for Souk
//!
//! Everything in this crate is deterministic and I/O-free: cart math,
//! loyalty accrual, report rankings, validation. The store and session
//! layers sit on top; nothing here knows they exist.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Souk Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     souk-app (Session Layer)                    │   │
//! │  │   login ──► cart ops ──► checkout ──► commit ──► reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ souk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │  │  types  │ │  money  │ │  cart   │ │ loyalty │ │ reports  │  │   │
//! │  │  │ Product │ │  Money  │ │  Cart   │ │ accrue  │ │ rankings │  │   │
//! │  │  │  Sale   │ │ TaxCalc │ │finalize │ │PointsInfo│ │  stats   │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK DEPENDENCIES IN MATH          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   souk-store (Snapshot Store)                   │   │
//! │  │             SQLite-backed key/value JSON snapshots              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Customer, etc.)
//! - [`money`] - Integer-cent monetary values, tax math
//! - [`settings`] - Application settings with merge-on-load upgrades
//! - [`cart`] - The in-progress sale and checkout math
//! - [`loyalty`] - Integer-only loyalty point accrual
//! - [`reports`] - Derived views (rankings, rolling statistics)
//! - [`error`] - Domain error types
//! - [`validation`] - Field and record validation
//!
//! ## Ground Rules
//!
//! Functions in this crate take values and return values. Time comes in as
//! a parameter, money is always integer cents, and failures are typed
//! errors rather than strings or panics. Anything that touches a database,
//! the clock, or a network belongs in a crate above this one.
//!
//! ## Example Usage
//!
//! ```rust
//! use souk_core::money::Money;
//! use souk_core::types::TaxRate;
//!
//! let price = Money::from_cents(1250);    // 12.50 MAD
//! let tax_rate = TaxRate::from_bps(2000); // 20%
//!
//! assert_eq!(price.calculate_tax(tax_rate).cents(), 250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod reports;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================
// The flat paths (`souk_core::Money`) are what the other crates import.

pub use cart::{Cart, CheckoutTotals, Tender};
pub use error::{CoreError, CoreResult, ValidationError};
pub use loyalty::{LoyaltyRate, PointsAccrual};
pub use money::Money;
pub use settings::{AppSettings, PrinterConfig, ReceiptSize, SecuritySettings, Theme};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Cap on distinct lines in one cart. Keeps a runaway scan session (or an
/// import gone wrong) from building an unboundedly large sale.
pub const MAX_CART_ITEMS: usize = 100;

/// Cap on the quantity of a single line. Catches fat-finger entries like
/// 1000 where 10 was meant.
pub const MAX_ITEM_QUANTITY: i64 = 999;
