//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{Credentials, LoginOutcome};
use crate::domain::errors::ApiError;
use crate::domain::ports::{SessionPort, TokenStoragePort};

const MIN_PASSWORD_CHARS: usize = 6;

/// Handles the authentication workflow: credentials in, persisted token and
/// fetched user out.
#[derive(Clone)]
pub struct LoginUseCase {
    session_port: Arc<dyn SessionPort>,
    storage_port: Arc<dyn TokenStoragePort>,
}

impl LoginUseCase {
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

    /// Executes a login. The user fetch is sequenced strictly after token
    /// persistence; any failure past the token write deletes it again so no
    /// partial session survives.
    ///
    /// # Errors
    /// `Validation` before any network call for malformed form input;
    /// otherwise whatever the backend calls produce.
    pub async fn execute(&self, credentials: &Credentials) -> Result<LoginOutcome, ApiError> {
        validate_credentials(credentials)?;

        debug!(email = %credentials.email, "Attempting login");

        let token = self
            .session_port
            .login(&credentials.email, &credentials.password)
            .await?;

        self.storage_port.store_token(&token).await?;
        debug!(token = %token, "Token persisted, fetching current user");

        match self.session_port.fetch_current_user().await {
            Ok(user) => {
                info!(user_id = %user.id(), "Login complete");
                Ok(LoginOutcome::new(user))
            }
            Err(e) => {
                warn!(error = %e, "User fetch after login failed, discarding token");
                if let Err(delete_error) = self.storage_port.delete_token().await {
                    warn!(error = %delete_error, "Failed to discard token");
                }
                Err(e)
            }
        }
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<(), ApiError> {
    let email = credentials.email.trim();
    let looks_like_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !looks_like_email {
        return Err(ApiError::validation("Enter a valid email address."));
    }

    if credentials.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(
            "Password must be at least 6 characters.",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::testing::token_without_expiry;
    use crate::domain::entities::User;
    use crate::domain::ports::mocks::{MockSessionPort, MockTokenStorage};

    fn valid_credentials() -> Credentials {
        Credentials::new("ada@example.com", "correct horse")
    }

    #[tokio::test]
    async fn test_successful_login_persists_before_user_fetch() {
        let session = Arc::new(MockSessionPort::accepting(
            token_without_expiry(),
            User::new("7", "ada@example.com"),
        ));
        let storage = Arc::new(MockTokenStorage::new());
        let use_case = LoginUseCase::new(session.clone(), storage.clone());

        let outcome = use_case.execute(&valid_credentials()).await.unwrap();

        assert_eq!(outcome.user.email(), "ada@example.com");
        assert!(storage.has_token().await.unwrap());
        assert_eq!(session.calls(), vec!["login", "fetch_current_user"]);
    }

    #[tokio::test]
    async fn test_missing_auth_header_leaves_no_token() {
        let session = Arc::new(MockSessionPort::without_auth_header());
        let storage = Arc::new(MockTokenStorage::new());
        let use_case = LoginUseCase::new(session, storage.clone());

        let result = use_case.execute(&valid_credentials()).await;

        assert!(matches!(result, Err(ApiError::ProtocolViolation { .. })));
        assert!(!storage.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_user_fetch_failure_clears_partial_state() {
        let session = Arc::new(MockSessionPort::with_revoked_session(
            token_without_expiry(),
        ));
        let storage = Arc::new(MockTokenStorage::new());
        let use_case = LoginUseCase::new(session, storage.clone());

        let result = use_case.execute(&valid_credentials()).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!storage.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_email_fails_without_network() {
        let session = Arc::new(MockSessionPort::accepting(
            token_without_expiry(),
            User::new("7", "ada@example.com"),
        ));
        let use_case = LoginUseCase::new(session.clone(), Arc::new(MockTokenStorage::new()));

        let result = use_case
            .execute(&Credentials::new("not-an-email", "longenough"))
            .await;

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_password_fails_without_network() {
        let session = Arc::new(MockSessionPort::accepting(
            token_without_expiry(),
            User::new("7", "ada@example.com"),
        ));
        let use_case = LoginUseCase::new(session.clone(), Arc::new(MockTokenStorage::new()));

        let result = use_case
            .execute(&Credentials::new("ada@example.com", "short"))
            .await;

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(session.calls().is_empty());
    }
}
