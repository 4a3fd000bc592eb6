//! # System Reset
//!
//! Factory reset behind four gates, because it destroys everything.
//!
//! ## Gate Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        reset_system()                                   │
//! │                                                                         │
//! │  1. role        signed-in admin?            no ──► Err(Unauthorized)    │
//! │  2. confirm     "this erases everything"    no ──► Ok(false)            │
//! │  3. password    admin password re-entered   no ──► Ok(false)            │
//! │                   └─ wrong ──► Err(AuthenticationFailed)                │
//! │  4. backup      document delivered to user  no ──► Err(BackupFailed)    │
//! │  5. confirm     last chance                 no ──► Ok(false)            │
//! │                                                                         │
//! │  then: erase every snapshot, reload defaults, back to the login screen  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Ok(false)` is a user changing their mind; errors are gates actively
//! refusing. The backup is delivered before the final confirmation so
//! the user holds the file before anything is erased.

use tracing::{info, warn};

use souk_store::SnapshotStore;

use crate::backup::BackupDocument;
use crate::checkout::CheckoutSession;
use crate::error::{AppError, AppResult};
use crate::session::AppContext;
use crate::state::AppState;

/// The prompts a reset walks through. A UI shell implements this over
/// its dialogs; tests script it.
pub trait ResetInteraction {
    /// First confirmation: the user accepts that all data will be erased.
    fn confirm_danger(&mut self) -> bool;

    /// Asks for the admin password. `None` means the prompt was
    /// cancelled.
    fn admin_password(&mut self) -> Option<String>;

    /// Hands the pre-reset backup to the user (e.g. a file download).
    /// Returns whether delivery succeeded.
    fn deliver_backup(&mut self, backup: &BackupDocument) -> bool;

    /// Final confirmation, after the backup is safely delivered.
    fn confirm_erase(&mut self) -> bool;
}

impl<S: SnapshotStore> AppContext<S> {
    /// Erases all data after the full gate sequence, reloading the
    /// post-reset defaults.
    ///
    /// Returns `Ok(true)` when the system was reset and `Ok(false)` when
    /// the user backed out at any confirmation.
    pub async fn reset_system(
        &mut self,
        interaction: &mut dyn ResetInteraction,
    ) -> AppResult<bool> {
        let username = match &self.state.current_user {
            Some(user) if user.is_admin() => user.username.clone(),
            _ => {
                warn!("System reset attempted without admin role");
                return Err(AppError::Unauthorized {
                    operation: "reset the system".to_string(),
                });
            }
        };

        if !interaction.confirm_danger() {
            info!("System reset cancelled at first confirmation");
            return Ok(false);
        }

        let Some(password) = interaction.admin_password() else {
            info!("System reset cancelled at password prompt");
            return Ok(false);
        };

        // Checked against the first admin account on file, not the
        // session copy
        let on_file = self.state.first_admin().map(|u| u.password.as_str());
        if on_file != Some(password.as_str()) {
            warn!("System reset rejected: wrong admin password");
            return Err(AppError::AuthenticationFailed);
        }

        let backup = self.export_backup()?;
        if !interaction.deliver_backup(&backup) {
            warn!("Backup delivery failed, reset aborted");
            return Err(AppError::BackupFailed);
        }

        if !interaction.confirm_erase() {
            info!("System reset cancelled at final confirmation");
            return Ok(false);
        }

        self.store.erase_all().await?;
        self.state = AppState::load(&self.store).await;
        self.checkout = CheckoutSession::new();

        info!(by = %username, "System reset complete");
        Ok(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
