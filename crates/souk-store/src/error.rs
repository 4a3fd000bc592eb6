//! # Store Error Types
//!
//! Failures a snapshot read or write can surface.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error ─────┐                                                     │
//! │                   ├──► StoreError (this module)                         │
//! │  serde_json ──────┘         │                                           │
//! │                             ▼                                           │
//! │             AppError::DataSaveFailed / DataVerificationFailed           │
//! │             (souk-app decides what a failed write means)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are best-effort by contract: every failure lands here as a value,
//! never as a panic, and the session layer above chooses whether to retry,
//! resync, or give up.

use thiserror::Error;

/// Snapshot storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// JSON (de)serialization of a snapshot payload failed. On the read
    /// side this only surfaces for raw access; typed loads fall back to
    /// defaults instead.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Could not reach the database at all: missing file that cannot be
    /// created, bad permissions, or a closed pool.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration did not apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// The database rejected a statement at runtime (disk full, readonly
    /// file, malformed SQL).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every pooled connection is busy and the acquire timeout elapsed.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that fits no bucket above.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
