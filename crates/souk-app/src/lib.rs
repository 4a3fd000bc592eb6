//! # Souk App
//!
//! The session layer of the Souk point of sale: one [`AppContext`]
//! object that a UI shell drives, wrapping the in-memory collections,
//! the snapshot store, and the workflows that keep them in agreement.
//!
//! ## Layer Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             souk-app                                    │
//! │                                                                         │
//! │   UI shell calls                      AppContext                        │
//! │   ─────────────                       ──────────                        │
//! │   login / logout ───────────────────► session                           │
//! │   edit catalog, people, settings ───► session (validate + persist)      │
//! │   scan, pay ────────────────────────► checkout (commit workflow)        │
//! │   dashboard, reports ───────────────► derived views (souk-core)         │
//! │   export / import ──────────────────► backup                            │
//! │   factory reset ────────────────────► reset (gated)                     │
//! │                                                                         │
//! │              souk-core (pure logic)  +  souk-store (SQLite)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`session`]: [`AppContext`], authentication, collection edits, views
//! - [`checkout`]: the cart and the save-verify sale commit workflow
//! - [`backup`]: whole-system export and subset import
//! - [`reset`]: the gated factory reset
//! - [`state`]: the in-memory collections
//! - [`error`]: session error types

pub mod backup;
pub mod checkout;
pub mod error;
pub mod reset;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod test_support;

pub use backup::{BackupDocument, ImportDocument};
pub use checkout::{CheckoutSession, CommitStatus, VERIFY_DELAY};
pub use error::{AppError, AppResult};
pub use reset::ResetInteraction;
pub use session::AppContext;
pub use state::AppState;
