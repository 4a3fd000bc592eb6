//! # SQLite Snapshot Store
//!
//! The production [`SnapshotStore`] backend: one SQLite file, one
//! `snapshots` table, one row per collection.
//!
//! ## Connection Pool
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StoreConfig          SqliteStore                                │
//! │  ───────────          ───────────                                │
//! │  database_path   ──▶  SqlitePool (WAL, NORMAL sync, FKs on)      │
//! │  max_connections      │                                          │
//! │  run_migrations  ──▶  embedded migrations on startup             │
//! │                       │                                          │
//! │                       └─▶ snapshots(key PRIMARY KEY, value)      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pragmas
//! WAL keeps readers from blocking the single writer, `synchronous =
//! NORMAL` is the safe pairing with WAL, and a busy timeout absorbs the
//! brief lock contention a till produces at checkout.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::keys::StoreKey;
use crate::migrations;
use crate::snapshot::SnapshotStore;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// Maximum pool size.
    pub max_connections: u32,
    /// Connections kept open even when idle.
    pub min_connections: u32,
    /// How long to wait for a free connection.
    pub connect_timeout: Duration,
    /// Idle time before a connection above the minimum is closed.
    pub idle_timeout: Duration,
    /// Whether to run embedded migrations on startup.
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Configuration for a database file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_path: path.as_ref().to_path_buf(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// In-memory database for tests. Pinned to one connection: each
    /// SQLite `:memory:` connection is its own database, so a pool of
    /// them would scatter the data.
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn skip_migrations(mut self) -> Self {
        self.run_migrations = false;
        self
    }
}

/// SQLite-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `config.database_path`
    /// and runs pending migrations.
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening snapshot store"
        );

        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let store = Self { pool };

        if config.run_migrations {
            migrations::run_migrations(store.pool()).await?;
        }

        Ok(store)
    }

    /// The underlying pool, for migrations and maintenance queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verifies the database answers a trivial query.
    pub async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool. Outstanding operations fail afterwards.
    pub async fn close(&self) {
        info!("Closing snapshot store");
        self.pool.close().await;
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn put_raw(&self, key: StoreKey, json: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = json.len(), "Writing snapshot");
        sqlx::query(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_raw(&self, key: StoreKey) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM snapshots WHERE key = ?")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn remove(&self, key: StoreKey) -> StoreResult<()> {
        sqlx::query("DELETE FROM snapshots WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn erase_all(&self) -> StoreResult<()> {
        info!("Erasing all snapshots");
        sqlx::query("DELETE FROM snapshots")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        SqliteStore::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_and_health_check() {
        let store = memory_store().await;
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_config_builders() {
        let config = StoreConfig::new("/tmp/souk.db")
            .max_connections(2)
            .connect_timeout(Duration::from_secs(1))
            .skip_migrations();

        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert!(!config.run_migrations);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = memory_store().await;

        store.put_raw(StoreKey::Products, "[]").await.unwrap();
        let value = store.get_raw(StoreKey::Products).await.unwrap();
        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_get_absent_key() {
        let store = memory_store().await;
        assert!(store.get_raw(StoreKey::Sales).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_previous_value() {
        let store = memory_store().await;

        store.put_raw(StoreKey::Settings, r#"{"a":1}"#).await.unwrap();
        store.put_raw(StoreKey::Settings, r#"{"a":2}"#).await.unwrap();

        let value = store.get_raw(StoreKey::Settings).await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"a":2}"#));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = memory_store().await;

        store.put_raw(StoreKey::CurrentUser, "{}").await.unwrap();
        store.remove(StoreKey::CurrentUser).await.unwrap();
        assert!(store.get_raw(StoreKey::CurrentUser).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let store = memory_store().await;
        store.remove(StoreKey::CurrentUser).await.unwrap();
    }

    #[tokio::test]
    async fn test_erase_all() {
        let store = memory_store().await;

        for key in StoreKey::ALL {
            store.put_raw(key, "{}").await.unwrap();
        }
        store.erase_all().await.unwrap();
        for key in StoreKey::ALL {
            assert!(store.get_raw(key).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("souk.db");

        {
            let store = SqliteStore::new(StoreConfig::new(&path)).await.unwrap();
            store.put_raw(StoreKey::Products, "[]").await.unwrap();
            store.close().await;
        }

        let store = SqliteStore::new(StoreConfig::new(&path)).await.unwrap();
        let value = store.get_raw(StoreKey::Products).await.unwrap();
        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_operations_fail_after_close() {
        let store = memory_store().await;
        store.close().await;

        let err = store.put_raw(StoreKey::Products, "[]").await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let store = memory_store().await;
        let (total, applied) = migrations::migration_status(store.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }
}
