//! Session port definition.

use async_trait::async_trait;

use crate::domain::entities::{SessionToken, User};
use crate::domain::errors::ApiError;

/// Port for the authentication endpoints of the backend.
#[async_trait]
pub trait SessionPort: Send + Sync {
    /// Submits credentials and returns the bearer token extracted from the
    /// `Authorization` response header. A 2xx response without that header
    /// is an [`ApiError::ProtocolViolation`].
    async fn login(&self, email: &str, password: &str) -> Result<SessionToken, ApiError>;

    /// Requests server-side session invalidation. Callers treat this as
    /// best-effort; local state is cleared regardless of the outcome.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Fetches the current user. A 401 means the session is gone
    /// server-side.
    async fn fetch_current_user(&self) -> Result<User, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Configurable in-memory session backend for tests. Records the order
    /// of calls so sequencing assertions can inspect it.
    pub struct MockSessionPort {
        login_token: Option<SessionToken>,
        user: Option<User>,
        fail_logout: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockSessionPort {
        /// Backend that accepts any credentials and knows the given user.
        pub fn accepting(token: SessionToken, user: User) -> Self {
            Self {
                login_token: Some(token),
                user: Some(user),
                fail_logout: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Backend whose login responds 2xx without an Authorization
        /// header.
        pub fn without_auth_header() -> Self {
            Self {
                login_token: None,
                user: None,
                fail_logout: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Backend that issues a token but rejects `/me` with a 401, like a
        /// revoked session.
        pub fn with_revoked_session(token: SessionToken) -> Self {
            Self {
                login_token: Some(token),
                user: None,
                fail_logout: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Makes the logout endpoint unreachable.
        pub fn failing_logout(mut self) -> Self {
            self.fail_logout = true;
            self
        }

        /// Returns the recorded call names in order.
        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }
    }

    #[async_trait]
    impl SessionPort for MockSessionPort {
        async fn login(&self, _email: &str, _password: &str) -> Result<SessionToken, ApiError> {
            self.record("login");
            self.login_token.clone().ok_or_else(|| {
                ApiError::protocol_violation("no Authorization header in login response")
            })
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.record("logout");
            if self.fail_logout {
                return Err(ApiError::network("connection refused"));
            }
            Ok(())
        }

        async fn fetch_current_user(&self) -> Result<User, ApiError> {
            self.record("fetch_current_user");
            self.user.clone().ok_or(ApiError::Unauthorized)
        }
    }
}
