//! Logout use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::ApiError;
use crate::domain::ports::{SessionPort, TokenStoragePort};

/// Ends the session. The server call is best-effort; the local token is
/// deleted no matter what, so a network failure during logout can never
/// leave the client appearing authenticated.
#[derive(Clone)]
pub struct LogoutUseCase {
    session_port: Arc<dyn SessionPort>,
    storage_port: Arc<dyn TokenStoragePort>,
}

impl LogoutUseCase {
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

    /// Executes logout. Idempotent.
    ///
    /// # Errors
    /// Only local storage failures surface; server-side failures are
    /// logged and swallowed.
    pub async fn execute(&self) -> Result<(), ApiError> {
        debug!("Requesting server-side session invalidation");
        if let Err(e) = self.session_port.logout().await {
            warn!(error = %e, "Server-side logout failed, clearing local session anyway");
        }

        self.storage_port.delete_token().await?;
        info!("Local session cleared");
        Ok(())
    }
}
