//! # Database Migrations
//!
//! Embedded schema management for the snapshot store.
//!
//! The whole store is one table, so the migration story is short: on
//! startup sqlx compares the SQL files compiled into the binary against
//! the `_sqlx_migrations` bookkeeping table and applies whatever is
//! missing, each file inside its own transaction.
//!
//! ```text
//! store open ──► _sqlx_migrations present? ──► apply pending, in
//!                (created on first run)        filename order
//!                                                   │
//!                001_initial_schema.sql  ✓ ◄────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! Drop a `NNN_description.sql` file into `migrations/` with the next
//! sequence number, written idempotently (`IF NOT EXISTS` where it
//! applies). Applied files are checksummed, so never edit an existing
//! one; ship a new file instead.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// Migrations embedded from the crate-local `migrations/` directory at
/// compile time; nothing is read from disk at runtime.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Applies any migrations the database has not seen yet.
///
/// Safe to call on every open: already-applied files are skipped, and
/// each pending file runs in its own transaction in filename order.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Migration bookkeeping for diagnostics: (embedded, applied) counts.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
