//! # Souk Store
//!
//! Durable storage for the Souk point of sale: whole-collection JSON
//! snapshots in SQLite.
//!
//! ## Storage Model
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                        snapshots table                             │
//! ├──────────────┬─────────────────────────────────────┬───────────────┤
//! │ key          │ value (JSON document)               │ updated_at    │
//! ├──────────────┼─────────────────────────────────────┼───────────────┤
//! │ products     │ [ {...}, {...}, ... ]               │ 2026-08-22 .. │
//! │ sales        │ [ {...}, ... ]                      │ 2026-08-22 .. │
//! │ customers    │ [ {...}, ... ]                      │ 2026-08-22 .. │
//! │ suppliers    │ [ ... ]                             │ 2026-08-22 .. │
//! │ users        │ [ {...}, {...} ]                    │ 2026-08-22 .. │
//! │ currentUser  │ {...}                               │ 2026-08-22 .. │
//! │ settings     │ {...}                               │ 2026-08-22 .. │
//! └──────────────┴─────────────────────────────────────┴───────────────┘
//! ```
//!
//! Each collection is written whole on every change. That trades write
//! amplification for a dead-simple durability story sized to a single
//! till: no partial updates, no joins, and the datasets stay small.
//!
//! ## Modules
//! - [`keys`]: the closed set of snapshot keys
//! - [`snapshot`]: the [`SnapshotStore`] trait and load/save policies
//! - [`sqlite`]: the production SQLite backend
//! - [`migrations`]: embedded schema migrations
//! - [`error`]: storage error types

pub mod error;
pub mod keys;
pub mod migrations;
pub mod snapshot;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use keys::StoreKey;
pub use snapshot::SnapshotStore;
pub use sqlite::{SqliteStore, StoreConfig};
