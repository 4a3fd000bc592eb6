//! # Session Error Types
//!
//! Errors surfaced by the session layer. The two sale-commit variants
//! exist because the UI treats them differently: a save failure means
//! the sale did not happen, a verification failure means it probably
//! did but the till should be checked before trusting it.

use thiserror::Error;

use souk_core::CoreError;
use souk_store::StoreError;

/// Errors from session workflows.
#[derive(Debug, Error)]
pub enum AppError {
    /// A sale commit is already running; the second request is dropped.
    #[error("A sale is already being saved")]
    SaleInProgress,

    /// The sale batch could not be written. Memory was resynced from the
    /// store; the sale must be rung up again.
    #[error("Failed to save sale data")]
    DataSaveFailed {
        #[source]
        source: StoreError,
    },

    /// The sale batch was written but the verification pass failed.
    #[error("Sale saved but verification failed")]
    DataVerificationFailed {
        #[source]
        source: StoreError,
    },

    /// Operation requires a role the signed-in user does not have.
    #[error("Not authorized to {operation}")]
    Unauthorized { operation: String },

    /// Wrong username or password.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Operation requires a signed-in user.
    #[error("No user is signed in")]
    NotSignedIn,

    /// The pre-reset backup could not be delivered; the reset is aborted.
    #[error("Backup could not be delivered")]
    BackupFailed,

    /// Storage error outside the sale commit workflow.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Business rule violation from the core layer.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience Result alias for session operations.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::SaleInProgress.to_string(),
            "A sale is already being saved"
        );
        assert_eq!(
            AppError::Unauthorized {
                operation: "reset the system".to_string()
            }
            .to_string(),
            "Not authorized to reset the system"
        );
        assert_eq!(AppError::NotSignedIn.to_string(), "No user is signed in");
    }

    #[test]
    fn test_core_error_converts() {
        let err: AppError = CoreError::EmptyCart.into();
        assert!(matches!(err, AppError::Core(CoreError::EmptyCart)));
        // transparent: message comes straight from the inner error
        assert_eq!(err.to_string(), CoreError::EmptyCart.to_string());
    }

    #[test]
    fn test_save_failure_keeps_source() {
        use std::error::Error;

        let err = AppError::DataSaveFailed {
            source: StoreError::Internal("disk full".to_string()),
        };
        assert!(err.source().is_some());
    }
}
