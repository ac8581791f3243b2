//! Startup session restore.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::User;
use crate::domain::errors::ApiError;
use crate::domain::ports::{SessionPort, TokenStoragePort};

/// Reconciles a stored token with server truth at startup: a locally valid
/// token still has to survive a `/me` fetch, since the server may have
/// revoked the session in the meantime.
pub struct RestoreSessionUseCase {
    session_port: Arc<dyn SessionPort>,
    storage_port: Arc<dyn TokenStoragePort>,
}

impl RestoreSessionUseCase {
    /// Creates the use case.
    #[must_use]
    pub const fn new(
        session_port: Arc<dyn SessionPort>,
        storage_port: Arc<dyn TokenStoragePort>,
    ) -> Self {
        Self {
            session_port,
            storage_port,
        }
    }

    /// Local-only validity check: a token is stored and its decoded expiry
    /// is in the future. Never issues a network call.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn is_locally_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self
            .storage_port
            .get_token()
            .await?
            .is_some_and(|token| !token.is_expired()))
    }

    /// Attempts to restore a session. `Ok(None)` means no usable session
    /// exists and the login surface should be shown; stale or rejected
    /// tokens are deleted along the way.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn execute(&self) -> Result<Option<User>, ApiError> {
        let Some(token) = self.storage_port.get_token().await? else {
            debug!("No stored session");
            return Ok(None);
        };

        if token.is_expired() {
            debug!(token = %token, "Stored token expired, clearing");
            self.storage_port.delete_token().await?;
            return Ok(None);
        }

        match self.session_port.fetch_current_user().await {
            Ok(user) => {
                info!(user_id = %user.id(), "Session restored");
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                info!("Stored session was revoked server-side, clearing");
                self.storage_port.delete_token().await?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Session restore failed, clearing");
                self.storage_port.delete_token().await?;
                Ok(None)
            }
        }
    }
}
